use crate::infrastructure::error::ClientError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The binary completion flip used by the list checkbox. The full
    /// three-value set is still settable through a `TaskPatch`.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Todo,
            Self::Todo | Self::InProgress => Self::Completed,
        }
    }
}

/// The central schedulable unit of work. `id` is assigned by the remote
/// gateway and immutable after creation; `due_date` is a calendar date with
/// no time-of-day component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub category: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl Task {
    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        validate_non_empty(&self.id, "id")?;
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_non_empty(&self.category, "category")?;
        Ok(())
    }
}

/// Create payload: everything but `id`, which the server assigns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub category: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_non_empty(&self.category, "category")?;
        Ok(())
    }
}

/// Partial update: fields left `None` are unchanged server-side.
/// `assignee_id` is doubly optional so that "leave unchanged" (`None`) and
/// "clear the assignment" (`Some(None)`) stay distinct on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<Option<String>>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())?;
        if let Some(category) = self.category.as_deref() {
            validate_non_empty(category, "category")?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee_id.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A person a task may be assigned to. Read-only here; owned by an external
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A task whose `assignee_id` points at a member absent from the known set
/// is still valid; it simply resolves to unassigned.
pub fn resolve_assignee<'a>(task: &Task, members: &'a [Member]) -> Option<&'a Member> {
    let assignee_id = task.assignee_id.as_deref()?;
    members.iter().find(|member| member.id == assignee_id)
}

/// Bearer session handed over by the external identity provider. This crate
/// never mints or refreshes it, only attaches it to outbound calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>, leeway_seconds: i64) -> bool {
        let unexpired = self
            .expires_at
            .is_none_or(|expires_at| expires_at > now + chrono::Duration::seconds(leeway_seconds));
        unexpired && !self.access_token.trim().is_empty()
    }
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(field_name, "must not be empty"));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ClientError> {
    validate_non_empty(title, "title")?;
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ClientError::validation(
            "title",
            "must be 50 characters or fewer",
        ));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ClientError> {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ClientError::validation(
                "description",
                "cannot exceed 500 characters",
            ));
        }
    }
    Ok(())
}
