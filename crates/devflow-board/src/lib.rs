/*
[INPUT]:  Public API exports for the devflow-board crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod calendar;
pub mod collision;
pub mod config;
pub mod coordinator;
pub mod drag;
pub mod draft;
pub mod error;
pub mod notice;
pub mod presenter;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use config::AppConfig;
pub use coordinator::{Coordinator, Settled};
pub use drag::DragTracker;
pub use draft::TaskDraft;
pub use error::{BoardError, Result};
pub use resolver::{DropTarget, Resolution};
pub use store::TaskStore;
