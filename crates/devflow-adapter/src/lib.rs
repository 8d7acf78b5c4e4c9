/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public DevFlow adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod backend;
pub mod http;
pub mod memory;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AuthManager, PersistentSessionStore, SessionManager, SignUpOutcome};

pub use backend::TaskBackend;

// Re-export commonly used types from http
pub use http::{ClientConfig, DevflowClient, DevflowError, Result};

pub use memory::{BackendCall, MEMORY_USER_ID, MemoryBackend, Operation};

// Re-export all types
pub use types::*;
