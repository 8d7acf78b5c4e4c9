/*
[INPUT]:  E-mail/password credentials and the HTTP client
[OUTPUT]: Authenticated session stored in the shared session slot
[POS]:    Auth layer - orchestrates password sign-in and sign-up
[UPDATE]: When auth endpoints or flow steps change
*/

use reqwest::Method;

use crate::http::{DevflowClient, DevflowError, Result};
use crate::types::{
    AuthResponse, Session, SignInRequest, SignUpMetadata, SignUpRequest, SignUpResponse, User,
};

const TOKEN_ENDPOINT: &str = "auth/v1/token";
const SIGNUP_ENDPOINT: &str = "auth/v1/signup";
const LOGOUT_ENDPOINT: &str = "auth/v1/logout";

/// Outcome of a sign-up request.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is active and signed in.
    SignedIn(Session),
    /// The account exists but its e-mail must be confirmed before sign-in.
    ConfirmationPending(User),
}

/// Manages the password authentication flow
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: DevflowClient,
}

impl AuthManager {
    pub fn new(client: DevflowClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DevflowClient {
        &self.client
    }

    /// Sign in with e-mail and password
    ///
    /// POST /auth/v1/token?grant_type=password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let body = SignInRequest {
            email: email.trim(),
            password,
        };
        let builder = self
            .client
            .request(Method::POST, TOKEN_ENDPOINT, &[("grant_type", "password")])?
            .json(&body);
        let response: AuthResponse = self.client.send_json(builder).await?;

        let session = response.into_session();
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.client.session().set(session.clone());
        Ok(session)
    }

    /// Register a new account
    ///
    /// POST /auth/v1/signup
    ///
    /// 1. Submit credentials with the display name as user metadata
    /// 2. Store the session when the service signs the user in directly
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<SignUpOutcome> {
        validate_credentials(email, password)?;

        let body = SignUpRequest {
            email: email.trim(),
            password,
            data: SignUpMetadata { name: name.trim() },
        };
        let builder = self
            .client
            .request(Method::POST, SIGNUP_ENDPOINT, &[])?
            .json(&body);
        let response: SignUpResponse = self.client.send_json(builder).await?;

        match response {
            SignUpResponse::Session(auth) => {
                let session = auth.into_session();
                tracing::info!(user_id = %session.user.id, "Registered and signed in");
                self.client.session().set(session.clone());
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponse::Pending(user) => {
                let user = user.into_user();
                tracing::info!(user_id = %user.id, "Registered, confirmation pending");
                Ok(SignUpOutcome::ConfirmationPending(user))
            }
        }
    }

    /// Revoke the session server-side (best effort) and forget it locally.
    pub async fn sign_out(&self) {
        if self.client.session().access_token().is_some() {
            let result = match self.client.request(Method::POST, LOGOUT_ENDPOINT, &[]) {
                Ok(builder) => self.client.send_empty(builder).await,
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, "Server-side sign out failed");
            }
        }
        self.client.session().clear();
    }

    /// Adopt a session restored from disk.
    pub fn restore(&self, session: Session) -> Result<()> {
        if session.is_expired() {
            return Err(DevflowError::SessionExpired);
        }
        self.client.session().set(session);
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.client.session().user()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.client.session().session()
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DevflowError::Authentication {
            message: "a valid e-mail address is required".to_string(),
        });
    }
    if password.is_empty() {
        return Err(DevflowError::Authentication {
            message: "password must not be empty".to_string(),
        });
    }
    Ok(())
}
