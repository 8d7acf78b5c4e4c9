/*
[INPUT]:  E-mail/password credentials and stored sessions
[OUTPUT]: Live sessions, bearer tokens and auth errors
[POS]:    Auth layer - handles hosted store authentication
[UPDATE]: When auth flow or session storage changes
*/

pub mod manager;
pub mod persistent_session;
pub mod session;

pub use manager::{AuthManager, SignUpOutcome};
pub use persistent_session::PersistentSessionStore;
pub use session::SessionManager;
