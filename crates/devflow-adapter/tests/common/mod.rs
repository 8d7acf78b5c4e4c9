/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for devflow-adapter tests

#![allow(dead_code)]

use chrono::{Duration, Utc};
use devflow_adapter::{DevflowClient, Session, User};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const ANON_KEY: &str = "anon-test-key";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> DevflowClient {
    DevflowClient::new(&server.uri(), ANON_KEY).expect("client")
}

/// Mock access token for testing
pub fn mock_access_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}

pub fn signed_in_session() -> Session {
    Session {
        access_token: mock_access_token(),
        expires_at: Utc::now() + Duration::hours(1),
        user: User::new("user-1", "ana@example.com", Some("Ana")),
    }
}

/// A task row as the REST endpoint returns it
pub fn task_row(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": status,
        "priority": "high",
        "user_id": "user-1",
        "created_at": "2026-03-01T09:00:00+00:00",
        "start_date": null,
        "end_date": null,
        "tags": ["work"],
    })
}
