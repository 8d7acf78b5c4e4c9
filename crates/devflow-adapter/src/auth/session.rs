/*
[INPUT]:  Sessions returned by the password grant / sign-up endpoints
[OUTPUT]: Shared access to the current session and its bearer token
[POS]:    Auth layer - session lifecycle management
[UPDATE]: When adding token refresh or changing storage strategy
*/

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{Session, User};

/// Thread-safe holder for the signed-in session.
///
/// Clones share the same slot, so the client and the auth manager always
/// agree on who is signed in.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    data: Arc<RwLock<Option<Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: Session) {
        *self.write() = Some(session);
    }

    /// The stored session, expired or not.
    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Bearer token of a live session.
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .filter(|session| !session.is_expired())
            .map(|session| session.access_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|session| session.user.clone())
    }

    /// True when there is no session or it has expired.
    pub fn is_expired(&self) -> bool {
        self.read().as_ref().is_none_or(Session::is_expired)
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
