/*
[INPUT]:  The task store
[OUTPUT]: Board columns, filtered list rows, and aggregate statistics
[POS]:    Consumer - thin read-only views over the store
[UPDATE]: When views need new projections
*/

use std::fmt;
use std::str::FromStr;

use devflow_adapter::{Task, TaskPriority, TaskStatus, UnknownVariant};

use crate::store::TaskStore;

/// Tasks of one board column, in list order.
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

pub fn columns(store: &TaskStore) -> Vec<Column<'_>> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| Column {
            status,
            tasks: store.with_status(status).collect(),
        })
        .collect()
}

pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::Completed => "Completed",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl ListFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Pending => task.status == TaskStatus::Pending,
            ListFilter::Completed => task.status == TaskStatus::Completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ListFilter::All => ListFilter::Pending,
            ListFilter::Pending => ListFilter::Completed,
            ListFilter::Completed => ListFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListFilter::All => "all",
            ListFilter::Pending => "pending",
            ListFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListFilter {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ListFilter::All),
            "pending" => Ok(ListFilter::Pending),
            "completed" => Ok(ListFilter::Completed),
            other => Err(UnknownVariant {
                kind: "filter",
                value: other.to_string(),
            }),
        }
    }
}

pub fn filtered(store: &TaskStore, filter: ListFilter) -> Vec<&Task> {
    store.tasks().iter().filter(|task| filter.matches(task)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Whole percent, rounded half up; 0 for an empty list.
    pub completion_rate: u32,
    /// High, medium, low.
    pub by_priority: Vec<(TaskPriority, usize)>,
    pub by_status: Vec<(TaskStatus, usize)>,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        let pending = total - completed;
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };

        let by_priority = TaskPriority::ALL
            .into_iter()
            .map(|priority| {
                let count = tasks.iter().filter(|task| task.priority == priority).count();
                (priority, count)
            })
            .collect();

        Self {
            total,
            completed,
            pending,
            completion_rate,
            by_priority,
            by_status: vec![
                (TaskStatus::Completed, completed),
                (TaskStatus::Pending, pending),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::task;
    use rstest::rstest;

    fn store() -> TaskStore {
        let mut high = task("c", TaskStatus::Completed, 3);
        high.priority = TaskPriority::High;
        TaskStore::from_tasks(vec![
            task("a", TaskStatus::Pending, 1),
            task("b", TaskStatus::Pending, 2),
            high,
        ])
    }

    #[test]
    fn columns_partition_in_list_order() {
        let store = store();
        let columns = columns(&store);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].status, TaskStatus::Pending);
        let pending: Vec<_> = columns[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(pending, vec!["b", "a"]);
        assert_eq!(columns[1].tasks.len(), 1);
    }

    #[rstest]
    #[case(ListFilter::All, 3)]
    #[case(ListFilter::Pending, 2)]
    #[case(ListFilter::Completed, 1)]
    fn filter_counts(#[case] filter: ListFilter, #[case] expected: usize) {
        assert_eq!(filtered(&store(), filter).len(), expected);
    }

    #[test]
    fn filter_cycles_and_parses() {
        assert_eq!(ListFilter::All.next().next().next(), ListFilter::All);
        assert_eq!("Completed".parse::<ListFilter>().unwrap(), ListFilter::Completed);
        assert!("done".parse::<ListFilter>().is_err());
    }

    #[test]
    fn stats_round_and_break_down() {
        let stats = Stats::from_tasks(store().tasks());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(
            stats.by_priority,
            vec![
                (TaskPriority::High, 1),
                (TaskPriority::Medium, 2),
                (TaskPriority::Low, 0)
            ]
        );
    }

    #[test]
    fn stats_of_nothing() {
        let stats = Stats::from_tasks(&[]);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn two_thirds_rounds_up() {
        let tasks = vec![
            task("a", TaskStatus::Completed, 1),
            task("b", TaskStatus::Completed, 2),
            task("c", TaskStatus::Pending, 3),
        ];
        assert_eq!(Stats::from_tasks(&tasks).completion_rate, 67);
    }
}
