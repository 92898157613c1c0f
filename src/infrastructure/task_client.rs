use crate::domain::models::{Member, Task, TaskDraft, TaskPatch};
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::credential_store::CredentialStore;
use crate::infrastructure::error::ClientError;
use crate::infrastructure::wire::{draft_to_wire, from_wire, patch_to_wire, WireTask};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use url::Url;

const TASK_SEGMENT: &str = "task";
const CATEGORY_SEGMENT: &str = "category";
const MEMBERS_SEGMENT: &str = "users";

// A session this close to expiry is treated as already expired, covering
// clock skew and request latency.
const EXPIRY_LEEWAY_SECONDS: i64 = 30;

/// The sole boundary across which tasks enter or leave the process, plus the
/// auxiliary read-only category and member collections.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    async fn get_task(&self, task_id: &str) -> Result<Task, ClientError>;

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ClientError>;

    async fn update_task(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, ClientError>;

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError>;

    async fn list_categories(&self) -> Result<Vec<String>, ClientError>;

    async fn list_members(&self) -> Result<Vec<Member>, ClientError>;
}

pub struct ReqwestTaskClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl ReqwestTaskClient {
    pub fn new(config: GatewayConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url,
            credentials,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidData("base URL cannot be a base".to_string()))?;
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    fn tasks_endpoint(&self) -> Result<Url, ClientError> {
        self.endpoint(&[TASK_SEGMENT])
    }

    fn task_endpoint(&self, task_id: &str) -> Result<Url, ClientError> {
        self.endpoint(&[TASK_SEGMENT, task_id])
    }

    /// Loads the bearer credential if one is available and not expired.
    /// Absence, expiry, and a failing store are not errors here; the request
    /// goes out unauthenticated and the server's verdict is surfaced as
    /// usual.
    fn bearer_token(&self) -> Option<String> {
        match self.credentials.load_session() {
            Ok(Some(session)) if session.is_valid_at(Utc::now(), EXPIRY_LEEWAY_SECONDS) => {
                Some(session.access_token)
            }
            Ok(Some(_)) => {
                tracing::debug!("stored session expired; sending unauthenticated request");
                None
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(error = %error, "credential store read failed; sending unauthenticated request");
                None
            }
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<(StatusCode, String), ClientError> {
        let request = match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|error| ClientError::Network(format!("{context}: {error}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| ClientError::Network(format!("failed reading {context} response: {error}")))?;
        Ok((status, body))
    }

    fn http_error(status: StatusCode, body: &str, resource: &str) -> ClientError {
        let body = body.trim();
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(resource.to_string()),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                if body.is_empty() {
                    ClientError::Validation("request rejected by server".to_string())
                } else {
                    ClientError::Validation(body.to_string())
                }
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                body: body.to_string(),
            },
        }
    }

    fn parse_task(body: &str) -> Result<Task, ClientError> {
        let wire: WireTask = serde_json::from_str(body)
            .map_err(|error| ClientError::InvalidData(format!("invalid task payload: {error}; body={body}")))?;
        from_wire(wire)
    }
}

#[async_trait]
impl TaskGateway for ReqwestTaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let endpoint = self.tasks_endpoint()?;
        let (status, body) = self
            .send(self.client.get(endpoint), "network error while listing tasks")
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, "task collection"));
        }

        let wires: Vec<WireTask> = serde_json::from_str(&body).map_err(|error| {
            ClientError::InvalidData(format!("invalid task list payload: {error}; body={body}"))
        })?;
        wires.into_iter().map(from_wire).collect()
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, ClientError> {
        let endpoint = self.task_endpoint(task_id)?;
        let (status, body) = self
            .send(self.client.get(endpoint), "network error while fetching task")
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, task_id));
        }
        Self::parse_task(&body)
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ClientError> {
        draft.validate()?;
        let endpoint = self.tasks_endpoint()?;
        let (status, body) = self
            .send(
                self.client.post(endpoint).json(&draft_to_wire(draft)),
                "network error while creating task",
            )
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, "task collection"));
        }
        Self::parse_task(&body)
    }

    async fn update_task(&self, task_id: &str, patch: &TaskPatch) -> Result<Task, ClientError> {
        patch.validate()?;
        let endpoint = self.task_endpoint(task_id)?;
        let (status, body) = self
            .send(
                self.client.patch(endpoint).json(&patch_to_wire(patch)),
                "network error while updating task",
            )
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, task_id));
        }
        Self::parse_task(&body)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        let endpoint = self.task_endpoint(task_id)?;
        let (status, body) = self
            .send(
                self.client.delete(endpoint),
                "network error while deleting task",
            )
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, task_id));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<String>, ClientError> {
        let endpoint = self.endpoint(&[TASK_SEGMENT, CATEGORY_SEGMENT])?;
        let (status, body) = self
            .send(
                self.client.get(endpoint),
                "network error while listing categories",
            )
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, "category list"));
        }
        serde_json::from_str(&body).map_err(|error| {
            ClientError::InvalidData(format!("invalid category list payload: {error}; body={body}"))
        })
    }

    async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        let endpoint = self.endpoint(&[MEMBERS_SEGMENT])?;
        let (status, body) = self
            .send(
                self.client.get(endpoint),
                "network error while listing members",
            )
            .await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body, "member list"));
        }
        serde_json::from_str(&body).map_err(|error| {
            ClientError::InvalidData(format!("invalid member list payload: {error}; body={body}"))
        })
    }
}
