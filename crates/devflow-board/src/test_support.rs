use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use devflow_adapter::{Task, TaskId, TaskPriority, TaskStatus};

/// A task whose creation time grows with `created`, so larger means newer.
pub fn task(id: &str, status: TaskStatus, created: i64) -> Task {
    Task {
        id: TaskId::new(id),
        title: format!("Task {id}"),
        description: String::new(),
        status,
        priority: TaskPriority::Medium,
        user_id: "user-1".to_string(),
        created_at: Utc.timestamp_opt(1_767_225_600 + created * 60, 0).unwrap(),
        start_date: None,
        end_date: None,
        tags: BTreeSet::new(),
    }
}
