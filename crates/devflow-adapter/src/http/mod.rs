/*
[INPUT]:  HTTP client configuration and hosted store endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod tasks;

pub use error::{DevflowError, Result};

pub use client::{ClientConfig, DevflowClient};
