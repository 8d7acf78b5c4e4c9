/*
[INPUT]:  Mock REST responses behind the HTTP client
[OUTPUT]: Coordinator outcomes for confirmed, failed and unauthorized writes
[POS]:    Integration test layer - engine over the real client
[UPDATE]: When error mapping or notice wording changes
*/

use std::sync::Arc;

use chrono::{Duration, Utc};
use devflow_adapter::{DevflowClient, Session, TaskId, TaskStatus, User};
use devflow_board::{Coordinator, DropTarget, Settled};
use serde_json::{Value, json};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn row(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": status,
        "priority": "medium",
        "user_id": "user-1",
        "created_at": "2026-03-01T09:00:00+00:00",
        "start_date": null,
        "end_date": null,
        "tags": [],
    })
}

async fn board_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row("a", "Ship release", "pending"),
            row("b", "Water plants", "completed"),
        ])))
        .mount(&server)
        .await;
    server
}

async fn coordinator_for(server: &MockServer) -> Coordinator {
    let client = assert_ok!(DevflowClient::new(&server.uri(), "anon-test-key"));
    client.session().set(Session {
        access_token: "test-token".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
        user: User::new("user-1", "ana@example.com", Some("Ana")),
    });

    let mut coordinator = Coordinator::new(Arc::new(client));
    assert_eq!(assert_ok!(coordinator.refresh().await), 2);
    coordinator
}

fn status_of(coordinator: &Coordinator, id: &str) -> Option<TaskStatus> {
    coordinator.store().get(&TaskId::new(id)).map(|task| task.status)
}

#[tokio::test]
async fn confirmed_drop_takes_the_server_record() {
    let server = board_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "eq.a"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row("a", "Ship release", "completed")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut coordinator = coordinator_for(&server).await;
    coordinator.apply_drop(&TaskId::new("a"), Some(&DropTarget::Column(TaskStatus::Completed)));

    let settled = coordinator.drain().await;
    assert!(matches!(settled.as_slice(), [Settled::Confirmed { .. }]));
    assert_eq!(status_of(&coordinator, "a"), Some(TaskStatus::Completed));
}

#[tokio::test]
async fn server_error_reverts_the_drop() {
    let server = board_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let mut coordinator = coordinator_for(&server).await;
    coordinator.apply_drop(&TaskId::new("b"), Some(&DropTarget::Card(TaskId::new("a"))));
    assert_eq!(status_of(&coordinator, "b"), Some(TaskStatus::Pending));

    let settled = coordinator.drain().await;
    assert!(matches!(settled.as_slice(), [Settled::RolledBack { .. }]));
    assert_eq!(status_of(&coordinator, "b"), Some(TaskStatus::Completed));

    let notice = coordinator.notices().latest().unwrap();
    assert!(notice.message.contains("Water plants"));
    assert!(notice.message.contains("change reverted"));
}

#[tokio::test]
async fn expired_token_asks_the_user_to_sign_in_again() {
    let server = board_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "JWT expired"})))
        .mount(&server)
        .await;

    let mut coordinator = coordinator_for(&server).await;
    assert_ok!(coordinator.toggle(&TaskId::new("a")));

    let settled = coordinator.drain().await;
    assert!(settled[0].error().is_some_and(|error| error.is_auth_error()));
    assert_eq!(status_of(&coordinator, "a"), Some(TaskStatus::Pending));
    assert!(coordinator.notices().latest().unwrap().message.contains("devflow login"));
}

#[tokio::test]
async fn empty_patch_response_is_treated_as_a_missing_row() {
    let server = board_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut coordinator = coordinator_for(&server).await;
    assert_ok!(coordinator.commit(&TaskId::new("a"), TaskStatus::Completed));

    let settled = coordinator.drain().await;
    assert!(settled[0].error().is_some_and(|error| error.is_not_found()));
    assert_eq!(status_of(&coordinator, "a"), Some(TaskStatus::Pending));
}
