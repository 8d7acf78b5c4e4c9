/*
[INPUT]:  Raw form / CLI input for a task
[OUTPUT]: Validated NewTask payloads and edit patches
[POS]:    Engine boundary - create/edit validation
[UPDATE]: When editable task fields change
*/

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use devflow_adapter::{NewTask, Task, TaskPatch, TaskPriority, parse_timestamp};

use crate::error::{BoardError, Result};

/// User-entered task fields, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Prefill for editing an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            start_date: task.start_date,
            end_date: task.end_date,
            tags: task.tags.iter().cloned().collect(),
        }
    }

    pub fn into_new_task(self) -> Result<NewTask> {
        let title = validated_title(&self.title)?;
        Ok(NewTask {
            title,
            description: self.description.trim().to_string(),
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            tags: normalize_tags(&self.tags),
        })
    }

    /// Patch carrying every editable field; schedule fields are set or cleared.
    pub fn into_patch(self) -> Result<TaskPatch> {
        let title = validated_title(&self.title)?;
        Ok(TaskPatch {
            title: Some(title),
            description: Some(self.description.trim().to_string()),
            status: None,
            priority: Some(self.priority),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            tags: Some(normalize_tags(&self.tags)),
        })
    }
}

/// Parse an optional schedule field typed by a user. Blank means absent.
pub fn parse_schedule(field: &str, value: &str) -> Result<Option<DateTime<Utc>>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_timestamp(value).map(Some).map_err(|_| {
        BoardError::Validation(format!(
            "{field} must look like 2026-03-01T09:30 or 2026-03-01, got {value:?}"
        ))
    })
}

/// Split a comma separated tag list.
pub fn split_tags(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

fn validated_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::Validation("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

fn normalize_tags(tags: &[String]) -> BTreeSet<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
