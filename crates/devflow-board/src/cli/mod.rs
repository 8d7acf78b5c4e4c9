/*
[INPUT]:  Parsed subcommands, application configuration
[OUTPUT]: Subcommand definitions and backend construction for the devflow binary
[POS]:    CLI layer root
[UPDATE]: 2026-10-17 Task, auth and init subcommands
*/

pub mod auth;
pub mod commands;
pub mod init;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use devflow_adapter::{
    AuthManager, DevflowClient, MemoryBackend, PersistentSessionStore, TaskBackend, TaskPriority,
    TaskStatus,
};
use devflow_board::config::{self, AppConfig, BackendMode};
use devflow_board::presenter::ListFilter;
use tracing::{info, warn};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Kanban board in the terminal (default)
    Board,
    /// Print tasks, newest first
    List {
        #[arg(long, value_name = "FILTER", default_value = "all")]
        filter: ListFilter,
    },
    /// Print task statistics
    Stats,
    /// Create a task
    Add(AddArgs),
    /// Change fields of a task
    Edit(EditArgs),
    /// Move a task to another column
    Move {
        /// Task id or a unique prefix of it
        id: String,
        #[arg(value_name = "STATUS")]
        status: TaskStatus,
    },
    /// Flip a task between pending and completed
    Toggle { id: String },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Sign in with e-mail and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Write a configuration file
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Task id or a unique prefix of it
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Optional task fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// 2026-03-01T09:30, 2026-03-01 or an RFC 3339 timestamp; empty clears it
    #[arg(long, value_name = "WHEN")]
    pub start: Option<String>,
    #[arg(long, value_name = "WHEN")]
    pub end: Option<String>,
    /// Repeat for several tags; replaces the current tags
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Remove all tags
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,
}

/// Where the signed-in session is kept, if the platform has a data directory.
pub fn session_store() -> Option<PersistentSessionStore> {
    config::session_dir().map(PersistentSessionStore::new)
}

/// Client and auth flow for the hosted store, with any stored session restored.
pub fn remote_auth(config: &AppConfig) -> Result<AuthManager> {
    let client = DevflowClient::with_config(
        &config.backend.url,
        config.backend.anon_key.clone(),
        config.backend.client_config(),
    )
    .context("create backend client")?;
    let auth = AuthManager::new(client);

    if let Some(session) = session_store().and_then(|store| store.load()) {
        match auth.restore(session) {
            Ok(()) => info!("restored stored session"),
            Err(err) => warn!(error = %err, "stored session not usable; run `devflow login`"),
        }
    }
    Ok(auth)
}

/// Backend selected by `backend.mode`. Also reports whether a user is signed in.
pub fn build_backend(config: &AppConfig) -> Result<(Arc<dyn TaskBackend>, bool)> {
    match config.backend.mode {
        BackendMode::Memory => {
            info!("using in-memory demo backend");
            Ok((Arc::new(MemoryBackend::demo()), true))
        }
        BackendMode::Remote => {
            let auth = remote_auth(config)?;
            let signed_in = auth.current_session().is_some();
            info!(url = %config.backend.url, signed_in, "using remote backend");
            Ok((Arc::new(auth.client().clone()), signed_in))
        }
    }
}
