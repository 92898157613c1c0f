use crate::domain::models::{Task, TaskDraft, TaskPatch};
use crate::infrastructure::error::ClientError;
use crate::infrastructure::task_client::TaskGateway;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::{sleep, Duration as TokioDuration};

pub type NowProvider = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Matches the five-minute freshness window the dashboard expects.
pub const DEFAULT_STALE_AFTER_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u8,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

/// What a reader sees. Always a cloned value; a snapshot handed out is never
/// touched again by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSnapshot {
    Loading,
    Ready(Vec<Task>),
    Failed(String),
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Option<Vec<Task>>,
    fetched_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    refresh_in_flight: bool,
    // Bumped when a refetch is issued and when a mutation lands. A refetch
    // result is applied only if nothing newer happened since its issuance,
    // so late stale responses are discarded.
    generation: u64,
}

/// Single source of truth for the cached task collection.
///
/// Mutations go through the gateway first; the visible snapshot is only
/// touched after the gateway confirms, so a failed write leaves the
/// last-known-good snapshot intact by construction. Successful mutations
/// apply the returned entity eagerly and mark the snapshot stale so the next
/// read triggers a refetch.
pub struct TaskStore<G: TaskGateway> {
    gateway: Arc<G>,
    state: Mutex<StoreState>,
    stale_after: Duration,
    retry_policy: RetryPolicy,
    now_provider: NowProvider,
}

impl<G: TaskGateway> TaskStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: Mutex::new(StoreState::default()),
            stale_after: Duration::seconds(DEFAULT_STALE_AFTER_SECONDS),
            retry_policy: RetryPolicy::default(),
            now_provider: Arc::new(Utc::now),
        }
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_now_provider(mut self, now_provider: NowProvider) -> Self {
        self.now_provider = now_provider;
        self
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, StoreState>, ClientError> {
        self.state
            .lock()
            .map_err(|error| ClientError::InvalidData(format!("task store lock poisoned: {error}")))
    }

    /// Current snapshot and its freshness verdict. A stale snapshot is still
    /// served; `Failed` appears only when there is no last-known-good data to
    /// fall back on.
    pub fn read(&self) -> TaskSnapshot {
        let Ok(state) = self.state.lock() else {
            return TaskSnapshot::Failed("task store lock poisoned".to_string());
        };
        match (&state.tasks, &state.last_error) {
            (Some(tasks), _) => TaskSnapshot::Ready(tasks.clone()),
            (None, Some(message)) => TaskSnapshot::Failed(message.clone()),
            (None, None) => TaskSnapshot::Loading,
        }
    }

    /// Per-id read from the same snapshot the collection read serves.
    pub fn task(&self, task_id: &str) -> Option<Task> {
        let state = self.state.lock().ok()?;
        state
            .tasks
            .as_ref()?
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
    }

    pub fn is_stale(&self) -> bool {
        let Ok(state) = self.state.lock() else {
            return true;
        };
        match state.fetched_at {
            Some(fetched_at) => (self.now_provider)() - fetched_at > self.stale_after,
            None => true,
        }
    }

    /// Refetches the collection. Concurrent triggers coalesce into the one
    /// in-flight request instead of issuing duplicates.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let issued = {
            let mut state = self.lock_state()?;
            if state.refresh_in_flight {
                tracing::debug!("refresh already in flight; coalescing");
                return Ok(());
            }
            state.refresh_in_flight = true;
            state.generation += 1;
            state.generation
        };

        let result = self.list_with_retry().await;

        let mut state = self.lock_state()?;
        state.refresh_in_flight = false;
        match result {
            Ok(tasks) => {
                if state.generation == issued {
                    tracing::debug!(count = tasks.len(), "task snapshot refreshed");
                    state.tasks = Some(tasks);
                    state.fetched_at = Some((self.now_provider)());
                    state.last_error = None;
                } else {
                    tracing::debug!(
                        issued,
                        current = state.generation,
                        "discarding superseded refresh response"
                    );
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "task refresh failed");
                state.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Serves the current snapshot immediately and refreshes only when it has
    /// outlived the freshness threshold. Never blocks a fresh snapshot on the
    /// network.
    pub async fn refresh_if_stale(&self) -> Result<(), ClientError> {
        if self.is_stale() {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ClientError> {
        draft.validate()?;
        let created = self.gateway.create_task(draft).await?;
        {
            let mut state = self.lock_state()?;
            state.generation += 1;
            if let Some(tasks) = state.tasks.as_mut() {
                tasks.push(created.clone());
            }
            state.fetched_at = None;
        }
        tracing::info!(task_id = %created.id, "task created");
        Ok(created)
    }

    pub async fn update(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, ClientError> {
        patch.validate()?;
        match self.gateway.update_task(task_id, patch).await {
            Ok(updated) => {
                {
                    let mut state = self.lock_state()?;
                    state.generation += 1;
                    if let Some(tasks) = state.tasks.as_mut() {
                        match tasks.iter_mut().find(|task| task.id == task_id) {
                            Some(slot) => *slot = updated.clone(),
                            None => tasks.push(updated.clone()),
                        }
                    }
                    state.fetched_at = None;
                }
                tracing::info!(task_id = %updated.id, "task updated");
                Ok(updated)
            }
            Err(error @ ClientError::NotFound(_)) => {
                // The referent is gone server-side; drop it locally too.
                self.evict(task_id)?;
                Err(error)
            }
            Err(error) => {
                tracing::warn!(task_id, error = %error, "task update failed; snapshot unchanged");
                Err(error)
            }
        }
    }

    /// Idempotent from the caller's perspective: a `NotFound` reply means the
    /// task is already gone, which is the outcome the caller asked for.
    pub async fn delete(&self, task_id: &str) -> Result<(), ClientError> {
        match self.gateway.delete_task(task_id).await {
            Ok(()) => {
                self.evict(task_id)?;
                tracing::info!(task_id, "task deleted");
                Ok(())
            }
            Err(ClientError::NotFound(_)) => {
                self.evict(task_id)?;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(task_id, error = %error, "task delete failed; snapshot unchanged");
                Err(error)
            }
        }
    }

    fn evict(&self, task_id: &str) -> Result<(), ClientError> {
        let mut state = self.lock_state()?;
        state.generation += 1;
        if let Some(tasks) = state.tasks.as_mut() {
            tasks.retain(|task| task.id != task_id);
        }
        state.fetched_at = None;
        Ok(())
    }

    async fn list_with_retry(&self) -> Result<Vec<Task>, ClientError> {
        let max_attempts = self.retry_policy.max_attempts.max(1);
        let mut attempt: u8 = 0;

        loop {
            match self.gateway.list_tasks().await {
                Ok(tasks) => return Ok(tasks),
                Err(error) if error.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = self
                        .retry_policy
                        .base_delay_ms
                        .saturating_mul(2u64.saturating_pow(u32::from(attempt)));
                    tracing::debug!(attempt, delay_ms = delay, "retrying task list fetch");
                    sleep(TokioDuration::from_millis(delay)).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(error) => return Err(error),
            }
        }
    }
}
