/*
[INPUT]:  Mock authentication responses
[OUTPUT]: Test results for auth flow
[POS]:    Integration tests - authentication
[UPDATE]: When auth endpoints or flow changes
*/

mod common;

use common::{ANON_KEY, client_for, mock_access_token, setup_mock_server, signed_in_session};
use devflow_adapter::{AuthManager, DevflowError, SignUpOutcome};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_auth_manager_starts_signed_out() {
    let server = setup_mock_server().await;
    let auth_manager = AuthManager::new(client_for(&server));

    assert!(auth_manager.current_user().is_none());
    assert!(auth_manager.client().session().is_expired());
}

#[tokio::test]
async fn test_sign_in_stores_session() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(json!({"email": "ana@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": mock_access_token(),
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "user-1",
                "email": "ana@example.com",
                "user_metadata": {"name": "Ana Lima"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    let session = assert_ok!(auth_manager.sign_in(" ana@example.com ", "hunter22").await);

    assert_eq!(session.user.name, "Ana Lima");
    assert_eq!(
        auth_manager.client().session().access_token(),
        Some(mock_access_token())
    );
}

#[tokio::test]
async fn test_sign_in_rejection_keeps_signed_out() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    let err = auth_manager.sign_in("ana@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, DevflowError::Api { code: 400, ref message } if message == "Invalid login credentials"));
    assert!(auth_manager.current_user().is_none());
}

#[tokio::test]
async fn test_sign_up_with_pending_confirmation() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "secret-pass",
            "data": {"name": ""}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-2",
            "email": "new@example.com",
            "user_metadata": {}
        })))
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    let outcome = assert_ok!(auth_manager.sign_up("new@example.com", "secret-pass", "").await);

    match outcome {
        SignUpOutcome::ConfirmationPending(user) => assert_eq!(user.name, "new"),
        other => panic!("expected pending confirmation, got {other:?}"),
    }
    assert!(auth_manager.current_user().is_none());
}

#[tokio::test]
async fn test_invalid_credentials_fail_before_any_request() {
    let server = setup_mock_server().await;
    let auth_manager = AuthManager::new(client_for(&server));

    let err = auth_manager.sign_in("not-an-email", "pw").await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_sign_out_clears_session_even_if_server_fails() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    assert_ok!(auth_manager.restore(signed_in_session()));
    assert!(auth_manager.current_user().is_some());

    auth_manager.sign_out().await;
    assert!(auth_manager.current_session().is_none());
}
