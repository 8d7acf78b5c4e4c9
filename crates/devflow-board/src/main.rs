/*
[INPUT]:  CLI arguments, layered configuration, OS shutdown signals
[OUTPUT]: Kanban TUI or one-shot task / auth command
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::Command;
use devflow_board::config::{AppConfig, LoggingConfig, Overrides};
use devflow_board::Coordinator;
use tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "devflow", version, about = "Personal task manager with a Kanban board")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Use the in-memory demo backend
    #[arg(long, global = true)]
    memory: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let command = args.command.unwrap_or(Command::Board);

    if let Command::Init { output } = &command {
        let logging = LoggingConfig {
            level: args.log_level.unwrap_or_else(|| "warn".to_string()),
            file: None,
        };
        init_tracing(&logging, None)?;
        return cli::init::run_init(output.clone());
    }

    let overrides = Overrides {
        memory: args.memory,
        log_level: args.log_level,
    };
    let config = AppConfig::load(args.config_path.as_deref(), &overrides)
        .context("load configuration")?;

    let log_buffer =
        matches!(command, Command::Board).then(|| LogBuffer::handle(LOG_BUFFER_CAPACITY));
    init_tracing(&config.logging, log_buffer.clone())?;
    info!(mode = ?config.backend.mode, command = ?command, "starting devflow");

    match command {
        Command::Board => {
            let log_buffer =
                log_buffer.ok_or_else(|| anyhow!("log buffer missing in board mode"))?;
            run_board(&config, log_buffer).await
        }
        Command::Login { email } => cli::auth::login(&config, email).await,
        Command::Register { email, name } => cli::auth::register(&config, email, name).await,
        Command::Logout => cli::auth::logout(&config).await,
        task_command => {
            let (backend, _) = cli::build_backend(&config)?;
            let mut coordinator = Coordinator::new(backend);
            cli::commands::run(&mut coordinator, task_command).await
        }
    }
}

async fn run_board(config: &AppConfig, log_buffer: LogBufferHandle) -> Result<()> {
    let (backend, signed_in) = cli::build_backend(config)?;
    let mut coordinator = Coordinator::new(backend);
    if !signed_in {
        coordinator
            .notices_mut()
            .info("Not signed in; changes need `devflow login`");
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    tui::run_tui(coordinator, &config.ui, log_buffer, shutdown)
        .await
        .context("run board")?;
    info!("board closed");
    Ok(())
}

/// Console output goes to stderr, or to the in-memory buffer while the TUI
/// owns the terminal. `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig, log_buffer: Option<LogBufferHandle>) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => {
            EnvFilter::try_new(value).context("invalid RUST_LOG")?
        }
        _ => EnvFilter::try_new(&logging.level).context("invalid log level")?,
    };

    let file_writer = match &logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("logging.file must name a file"))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(writer)
        }
        None => None,
    };

    let (stderr_layer, buffer_layer) = match log_buffer {
        Some(buffer) => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(LogWriterFactory::new(buffer)),
            ),
        ),
        None => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
    };
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(buffer_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
