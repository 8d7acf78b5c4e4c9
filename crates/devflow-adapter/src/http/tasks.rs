/*
[INPUT]:  Task ids, patches and new-task payloads
[OUTPUT]: Validated Task records from the hosted task table
[POS]:    HTTP layer - task table endpoints
[UPDATE]: When the task table endpoints or filters change
*/

// ### Task Endpoints

use reqwest::Method;

use crate::http::{DevflowClient, DevflowError, Result};
use crate::types::{NewTask, NewTaskRow, RawTask, Task, TaskId, TaskPatch, TaskStatus, ingest_tasks};

const TASKS_ENDPOINT: &str = "rest/v1/tasks";
const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

impl DevflowClient {
    /// List the signed-in user's tasks, newest first
    ///
    /// GET /rest/v1/tasks?select=*&order=created_at.desc
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let builder = self.request(
            Method::GET,
            TASKS_ENDPOINT,
            &[("select", "*"), ("order", "created_at.desc")],
        )?;
        let rows: Vec<RawTask> = self.send_json(builder).await?;
        let fetched = rows.len();
        let tasks = ingest_tasks(rows);
        tracing::debug!(fetched, kept = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Insert a task owned by the signed-in user
    ///
    /// POST /rest/v1/tasks
    pub async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        let session = self
            .session()
            .session()
            .ok_or_else(DevflowError::not_signed_in)?;
        if session.is_expired() {
            return Err(DevflowError::SessionExpired);
        }

        let row = NewTaskRow {
            user_id: &session.user.id,
            status: TaskStatus::Pending,
            task: new_task,
        };
        let builder = self
            .request(Method::POST, TASKS_ENDPOINT, &[("select", "*")])?
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&[row]);

        let rows: Vec<RawTask> = self.send_json(builder).await?;
        let task = first_row(rows, "create returned no rows")?;
        tracing::info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Patch the given fields of one task
    ///
    /// PATCH /rest/v1/tasks?id=eq.{id}
    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task> {
        let filter = format!("eq.{id}");
        let builder = self
            .request(Method::PATCH, TASKS_ENDPOINT, &[("id", filter.as_str()), ("select", "*")])?
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(patch);

        let rows: Vec<RawTask> = self.send_json(builder).await?;
        if rows.is_empty() {
            return Err(DevflowError::NotFound { id: id.to_string() });
        }
        first_row(rows, "updated row failed validation")
    }

    /// Delete one task
    ///
    /// DELETE /rest/v1/tasks?id=eq.{id}
    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let filter = format!("eq.{id}");
        let builder = self
            .request(Method::DELETE, TASKS_ENDPOINT, &[("id", filter.as_str()), ("select", "id")])?
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1);

        let rows: Vec<serde_json::Value> = self.send_json(builder).await?;
        if rows.is_empty() {
            return Err(DevflowError::NotFound { id: id.to_string() });
        }
        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }
}

fn first_row(rows: Vec<RawTask>, context: &str) -> Result<Task> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| DevflowError::InvalidResponse(context.to_string()))?;
    row.into_task()
        .map_err(|err| DevflowError::InvalidResponse(format!("{context}: {err}")))
}
