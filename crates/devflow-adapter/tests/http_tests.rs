/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for the task table endpoints
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::{ANON_KEY, client_for, mock_access_token, setup_mock_server, signed_in_session, task_row};
use devflow_adapter::{
    ClientConfig, DevflowClient, DevflowError, NewTask, TaskBackend, TaskId, TaskPatch,
    TaskPriority, TaskStatus,
};
use serde_json::json;
use std::collections::BTreeSet;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let _client = assert_ok!(DevflowClient::with_config("https://example.test", ANON_KEY, config));
}

#[tokio::test]
async fn test_list_tasks_sends_keys_and_order() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_row("b", "Second", "completed"),
            task_row("a", "First", "pending"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tasks = assert_ok!(client.list_tasks().await);

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::new("b"));
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert_eq!(tasks[1].description, "");
    assert!(tasks[1].tags.contains("work"));
}

#[tokio::test]
async fn test_list_tasks_filters_unparseable_rows() {
    let server = setup_mock_server().await;
    let mut broken = task_row("x", "Broken", "pending");
    broken["start_date"] = json!("not a date");

    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_row("a", "Fine", "pending"),
            broken,
            task_row("y", "Unknown", "archived"),
        ])))
        .mount(&server)
        .await;

    let tasks = assert_ok!(client_for(&server).list_tasks().await);
    let ids: Vec<_> = tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[tokio::test]
async fn test_session_token_is_used_as_bearer() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .and(header("authorization", format!("Bearer {}", mock_access_token()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.session().set(signed_in_session());
    let tasks = assert_ok!(client.list_tasks().await);
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_update_task_sends_only_patched_fields() {
    let server = setup_mock_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "eq.a"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_row("a", "First", "completed")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let task = assert_ok!(
        client
            .update_task(&TaskId::new("a"), &TaskPatch::status(TaskStatus::Completed))
            .await
    );
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .update_task(&TaskId::new("gone"), &TaskPatch::status(TaskStatus::Pending))
        .await;
    assert!(matches!(result, Err(DevflowError::NotFound { ref id }) if id == "gone"));
}

#[tokio::test]
async fn test_create_task_requires_session() {
    let server = setup_mock_server().await;
    let client = client_for(&server);
    let new_task = NewTask {
        title: "Plan".to_string(),
        description: String::new(),
        priority: TaskPriority::Medium,
        start_date: None,
        end_date: None,
        tags: BTreeSet::new(),
    };

    let result = client.create_task(&new_task).await;
    assert!(result.is_err_and(|err| err.is_auth_error()));
}

#[tokio::test]
async fn test_create_task_posts_owned_row() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tasks"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{
            "user_id": "user-1",
            "status": "pending",
            "title": "Plan",
            "description": "",
            "priority": "medium",
            "tags": [],
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([task_row("new-1", "Plan", "pending")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.session().set(signed_in_session());
    let new_task = NewTask {
        title: "Plan".to_string(),
        description: String::new(),
        priority: TaskPriority::Medium,
        start_date: None,
        end_date: None,
        tags: BTreeSet::new(),
    };

    let created = assert_ok!(client.create_task(&new_task).await);
    assert_eq!(created.id, TaskId::new("new-1"));
}

#[tokio::test]
async fn test_delete_task_through_backend_trait() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "eq.a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}])))
        .expect(1)
        .mount(&server)
        .await;

    let backend: &dyn TaskBackend = &client_for(&server);
    assert_ok!(backend.delete_task(&TaskId::new("a")).await);
}

#[tokio::test]
async fn test_error_statuses_map_to_variants() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "JWT expired"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.list_tasks().await {
        Err(DevflowError::Authentication { message }) => assert_eq!(message, "JWT expired"),
        other => panic!("expected authentication error, got {other:?}"),
    }
    match client.delete_task(&TaskId::new("a")).await {
        Err(DevflowError::Api { code, message }) => {
            assert_eq!(code, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tasks().await.unwrap_err();
    assert!(matches!(err, DevflowError::RateLimit { retry_after: 12 }));
}
