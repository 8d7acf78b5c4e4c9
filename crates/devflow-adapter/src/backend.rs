/*
[INPUT]:  Task ids, patches and new-task payloads from the board engine
[OUTPUT]: Authoritative task records or failures
[POS]:    Backend seam - what the synchronization engine needs from a store
[UPDATE]: When the engine needs a new remote operation
*/

use async_trait::async_trait;

use crate::http::{DevflowClient, Result};
use crate::types::{NewTask, Task, TaskId, TaskPatch};

/// Remote task persistence as seen by the board engine.
///
/// Implementations must be shareable across spawned tasks. Records returned
/// from `list_tasks` have already passed ingestion.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// All tasks of the current user, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Insert a task and return the stored record.
    async fn create_task(&self, new_task: &NewTask) -> Result<Task>;

    /// Apply a patch and return the stored record. Identical calls are idempotent.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task>;

    async fn delete_task(&self, id: &TaskId) -> Result<()>;
}

#[async_trait]
impl TaskBackend for DevflowClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        DevflowClient::list_tasks(self).await
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        DevflowClient::create_task(self, new_task).await
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task> {
        DevflowClient::update_task(self, id, patch).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        DevflowClient::delete_task(self, id).await
    }
}
