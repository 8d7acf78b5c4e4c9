/*
[INPUT]:  Signed-in session and a storage directory
[OUTPUT]: Session restored across process runs
[POS]:    Auth layer - on-disk session persistence
[UPDATE]: When the session file format or location changes
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::Session;

const SESSION_FILE: &str = "session.json";

/// Persists the current session as JSON, readable by the owner only.
#[derive(Debug, Clone)]
pub struct PersistentSessionStore {
    dir: PathBuf,
}

impl PersistentSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load a previously saved session. Unreadable or malformed files count as absent.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(self.path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(path = %self.path().display(), error = %err, "Ignoring malformed session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let encoded = serde_json::to_string_pretty(session).map_err(io::Error::other)?;
        fs::write(&path, encoded)?;
        restrict_permissions(&path)?;

        Ok(())
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.path()) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
