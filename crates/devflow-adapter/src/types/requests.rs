/*
[INPUT]:  Task field changes and credentials collected by the client
[OUTPUT]: Serializable request bodies for the task table and auth endpoints
[POS]:    Data layer - outbound payloads
[UPDATE]: When the task table or auth request shapes change
*/

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::enums::{TaskPriority, TaskStatus};
use super::models::Task;

/// Fields of a task the client supplies on creation.
///
/// Identifier, owner and creation time are assigned server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub tags: BTreeSet<String>,
}

/// Row inserted into the task table: a `NewTask` plus owner and initial status.
#[derive(Debug, Clone, Serialize)]
pub struct NewTaskRow<'a> {
    pub user_id: &'a str,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub task: &'a NewTask,
}

/// Partial update of a task. Absent fields are left untouched.
///
/// The schedule fields are doubly optional: `Some(None)` clears the
/// timestamp and goes over the wire as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrite the fields this patch carries; the identifier is never touched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(start) = self.start_date {
            task.start_date = start;
        }
        if let Some(end) = self.end_date {
            task.end_date = end;
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
    }

    /// Copy of `task` with this patch applied.
    pub fn applied(&self, task: &Task) -> Task {
        let mut next = task.clone();
        self.apply_to(&mut next);
        next
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpMetadata<'a> {
    pub name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskId;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Task {
        Task {
            id: TaskId::new("t1"),
            title: "Write report".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            user_id: "u1".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            start_date: Some(Utc.with_ymd_and_hms(2026, 1, 3, 9, 0, 0).unwrap()),
            end_date: None,
            tags: BTreeSet::new(),
        }
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = TaskPatch::status(TaskStatus::Completed);
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"status": "completed"}));
    }

    #[test]
    fn cleared_schedule_goes_out_as_null() {
        let patch = TaskPatch {
            start_date: Some(None),
            ..TaskPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"start_date": null}));
    }

    #[test]
    fn apply_keeps_identity_and_untouched_fields() {
        let task = sample();
        let patch = TaskPatch {
            title: Some("Ship report".to_string()),
            start_date: Some(None),
            ..TaskPatch::default()
        };

        let next = patch.applied(&task);
        assert_eq!(next.id, task.id);
        assert_eq!(next.title, "Ship report");
        assert_eq!(next.start_date, None);
        assert_eq!(next.status, task.status);
        assert_eq!(next.created_at, task.created_at);
    }

    #[test]
    fn new_task_row_flattens_fields() {
        let new_task = NewTask {
            title: "Plan".to_string(),
            description: "week".to_string(),
            priority: TaskPriority::High,
            start_date: None,
            end_date: None,
            tags: BTreeSet::from(["work".to_string()]),
        };
        let row = NewTaskRow {
            user_id: "u1",
            status: TaskStatus::Pending,
            task: &new_task,
        };

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({
                "user_id": "u1",
                "status": "pending",
                "title": "Plan",
                "description": "week",
                "priority": "high",
                "tags": ["work"],
            })
        );
    }
}
