/*
[INPUT]:  Validation failures, missing tasks, adapter errors, config problems
[OUTPUT]: BoardError and the crate Result alias
[POS]:    Error handling layer - board engine errors
[UPDATE]: When the engine gains a new failure class
*/

use devflow_adapter::{DevflowError, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Input rejected before any store mutation
    #[error("Invalid task: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error(transparent)]
    Remote(#[from] DevflowError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BoardError {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, BoardError::Remote(err) if err.is_auth_error())
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
