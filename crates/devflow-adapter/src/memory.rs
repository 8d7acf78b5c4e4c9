/*
[INPUT]:  Seed tasks and scripted failures
[OUTPUT]: In-process TaskBackend with a call log
[POS]:    Backend seam - offline demo mode and deterministic test double
[UPDATE]: When TaskBackend gains operations or tests need new failure modes
*/

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::TaskBackend;
use crate::http::{DevflowError, Result};
use crate::types::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};

pub const MEMORY_USER_ID: &str = "local-user";

/// Which backend operation a call or a scripted failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List,
    Create { title: String },
    Update { id: TaskId, patch: TaskPatch },
    Delete { id: TaskId },
}

impl BackendCall {
    pub fn operation(&self) -> Operation {
        match self {
            BackendCall::List => Operation::List,
            BackendCall::Create { .. } => Operation::Create,
            BackendCall::Update { .. } => Operation::Update,
            BackendCall::Delete { .. } => Operation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    calls: Vec<BackendCall>,
    failures: VecDeque<(Operation, String)>,
}

/// Task store kept in process memory.
///
/// Clones share state, so a test can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given tasks; they are kept newest first.
    pub fn with_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                tasks,
                ..MemoryState::default()
            })),
            latency: None,
        }
    }

    /// A small board for the offline demo.
    pub fn demo() -> Self {
        let now = Utc::now();
        let seed = [
            ("Plan the week", "Review goals and block focus time", TaskStatus::Pending, TaskPriority::High, 1, &["planning"][..]),
            ("Reply to invoices", "", TaskStatus::Pending, TaskPriority::Medium, 2, &["admin"][..]),
            ("Read the paper on CRDTs", "Section 4 onwards", TaskStatus::Pending, TaskPriority::Low, 3, &["reading", "research"][..]),
            ("Book dentist appointment", "", TaskStatus::Completed, TaskPriority::Medium, 4, &[][..]),
            ("Set up backups", "Weekly snapshot of the home folder", TaskStatus::Completed, TaskPriority::High, 5, &["infra"][..]),
        ];

        let tasks = seed
            .into_iter()
            .map(|(title, description, status, priority, age_hours, tags)| Task {
                id: TaskId::new(Uuid::new_v4().to_string()),
                title: title.to_string(),
                description: description.to_string(),
                status,
                priority,
                user_id: MEMORY_USER_ID.to_string(),
                created_at: now - ChronoDuration::hours(age_hours),
                start_date: (age_hours == 1).then(|| now + ChronoDuration::hours(2)),
                end_date: (age_hours == 1).then(|| now + ChronoDuration::hours(3)),
                tags: tags.iter().map(|tag| tag.to_string()).collect::<BTreeSet<_>>(),
            })
            .collect();

        Self::with_tasks(tasks)
    }

    /// Delay every call, to keep mutations in flight for a while.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call of `operation` fail with `message`. Failures queue up.
    pub async fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.state
            .lock()
            .await
            .failures
            .push_back((operation, message.into()));
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().await.calls.clone()
    }

    /// Recorded calls of one kind.
    pub async fn calls_of(&self, operation: Operation) -> Vec<BackendCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| call.operation() == operation)
            .collect()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.state
            .lock()
            .await
            .tasks
            .iter()
            .find(|task| &task.id == id)
            .cloned()
    }

    async fn begin(&self, call: BackendCall) -> Result<tokio::sync::MutexGuard<'_, MemoryState>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        let operation = call.operation();
        state.calls.push(call);

        if let Some(index) = state.failures.iter().position(|(op, _)| *op == operation) {
            if let Some((_, message)) = state.failures.remove(index) {
                tracing::debug!(?operation, %message, "Injected backend failure");
                return Err(DevflowError::Simulated(message));
            }
        }
        Ok(state)
    }
}

#[async_trait]
impl TaskBackend for MemoryBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let state = self.begin(BackendCall::List).await?;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        let mut state = self
            .begin(BackendCall::Create {
                title: new_task.title.clone(),
            })
            .await?;

        let task = Task {
            id: TaskId::new(Uuid::new_v4().to_string()),
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            status: TaskStatus::Pending,
            priority: new_task.priority,
            user_id: MEMORY_USER_ID.to_string(),
            created_at: Utc::now(),
            start_date: new_task.start_date,
            end_date: new_task.end_date,
            tags: new_task.tags.clone(),
        };
        state.tasks.insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task> {
        let mut state = self
            .begin(BackendCall::Update {
                id: id.clone(),
                patch: patch.clone(),
            })
            .await?;

        let task = state
            .tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| DevflowError::NotFound { id: id.to_string() })?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let mut state = self.begin(BackendCall::Delete { id: id.clone() }).await?;

        let before = state.tasks.len();
        state.tasks.retain(|task| &task.id != id);
        if state.tasks.len() == before {
            return Err(DevflowError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            priority: TaskPriority::Low,
            start_date: None,
            end_date: None,
            tags: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn create_inserts_newest_first() {
        let backend = MemoryBackend::new();
        let first = assert_ok!(backend.create_task(&new_task("first")).await);
        let second = assert_ok!(backend.create_task(&new_task("second")).await);

        let ids: Vec<_> = assert_ok!(backend.list_tasks().await).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(second.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn scripted_failure_hits_only_its_operation_once() {
        let backend = MemoryBackend::new();
        let task = assert_ok!(backend.create_task(&new_task("a")).await);
        backend.fail_next(Operation::Update, "offline").await;

        assert_ok!(backend.list_tasks().await);
        let failed = backend
            .update_task(&task.id, &TaskPatch::status(TaskStatus::Completed))
            .await;
        assert!(matches!(failed, Err(DevflowError::Simulated(ref m)) if m == "offline"));

        let updated = assert_ok!(
            backend
                .update_task(&task.id, &TaskPatch::status(TaskStatus::Completed))
                .await
        );
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(backend.calls_of(Operation::Update).await.len(), 2);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let backend = MemoryBackend::new();
        let id = TaskId::new("ghost");

        let update = backend.update_task(&id, &TaskPatch::status(TaskStatus::Completed)).await;
        assert!(update.is_err_and(|err| err.is_not_found()));
        let delete = backend.delete_task(&id).await;
        assert!(delete.is_err_and(|err| err.is_not_found()));
    }

    #[tokio::test]
    async fn demo_board_has_both_columns() {
        let tasks = MemoryBackend::demo().tasks().await;
        assert!(tasks.iter().any(|task| task.status == TaskStatus::Pending));
        assert!(tasks.iter().any(|task| task.status == TaskStatus::Completed));
        assert!(tasks.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    }
}
