use crate::domain::models::{Task, TaskDraft, TaskPatch, TaskStatus};
use crate::infrastructure::error::ClientError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One task record as the gateway exchanges it. Dates travel as `YYYY-MM-DD`
/// strings; relations travel as `assignee_id` only, never as embedded
/// objects. Unknown wire fields are dropped on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireTask {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    pub category: String,
    pub due_date: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WireTaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    pub category: String,
    pub due_date: String,
    pub status: TaskStatus,
}

/// Partial-update body. Absent fields are left unchanged server-side;
/// `assignee_id` serializes `Some(None)` as an explicit `null` to clear the
/// assignment.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct WireTaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Formats a due date from its calendar fields. `NaiveDate` carries no
/// timezone, so no UTC-instant arithmetic can shift the day here.
fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

fn parse_wire_date(value: &str) -> Result<NaiveDate, ClientError> {
    NaiveDate::parse_from_str(value, WIRE_DATE_FORMAT)
        .map_err(|error| ClientError::InvalidData(format!("invalid due_date '{value}': {error}")))
}

pub fn to_wire(task: &Task) -> WireTask {
    WireTask {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        assignee_id: task.assignee_id.clone(),
        category: task.category.clone(),
        due_date: format_wire_date(task.due_date),
        status: task.status,
    }
}

pub fn from_wire(wire: WireTask) -> Result<Task, ClientError> {
    Ok(Task {
        due_date: parse_wire_date(&wire.due_date)?,
        id: wire.id,
        title: wire.title,
        description: wire.description,
        assignee_id: wire.assignee_id,
        category: wire.category,
        status: wire.status,
    })
}

pub fn draft_to_wire(draft: &TaskDraft) -> WireTaskDraft {
    WireTaskDraft {
        title: draft.title.clone(),
        description: draft.description.clone(),
        assignee_id: draft.assignee_id.clone(),
        category: draft.category.clone(),
        due_date: format_wire_date(draft.due_date),
        status: draft.status,
    }
}

pub fn patch_to_wire(patch: &TaskPatch) -> WireTaskPatch {
    WireTaskPatch {
        title: patch.title.clone(),
        description: patch.description.clone(),
        assignee_id: patch.assignee_id.clone(),
        category: patch.category.clone(),
        due_date: patch.due_date.map(format_wire_date),
        status: patch.status,
    }
}
