/*
[INPUT]:  Interactive credentials via CLI, application configuration
[OUTPUT]: Signed-in session persisted for later runs, or removed
[POS]:    CLI auth commands
[UPDATE]: 2026-10-17 Password login, registration and logout
*/

use anyhow::{Context, Result, bail};
use console::style;
use devflow_adapter::{AuthManager, Session, SignUpOutcome};
use devflow_board::config::{AppConfig, BackendMode};
use dialoguer::{Input, Password, theme::ColorfulTheme};
use tracing::warn;

use super::{remote_auth, session_store};

pub async fn login(config: &AppConfig, email: Option<String>) -> Result<()> {
    let auth = remote_only(config)?;
    let theme = ColorfulTheme::default();

    let email = match email {
        Some(email) => email,
        None => prompt_email(&theme, config)?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()
        .context("read password")?;

    let session = auth.sign_in(&email, &password).await.context("sign in")?;
    persist(&session)?;
    println!(
        "{} {}",
        style("Signed in as").green(),
        style(&session.user.name).bold()
    );
    Ok(())
}

pub async fn register(
    config: &AppConfig,
    email: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let auth = remote_only(config)?;
    let theme = ColorfulTheme::default();

    let email = match email {
        Some(email) => email,
        None => prompt_email(&theme, config)?,
    };
    let name = match name {
        Some(name) => name,
        None => Input::with_theme(&theme)
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()
            .context("read name")?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()
        .context("read password")?;

    match auth
        .sign_up(&email, &password, &name)
        .await
        .context("register")?
    {
        SignUpOutcome::SignedIn(session) => {
            persist(&session)?;
            println!(
                "{} {}",
                style("Registered and signed in as").green(),
                style(&session.user.name).bold()
            );
        }
        SignUpOutcome::ConfirmationPending(user) => {
            println!(
                "{} Check {} for a confirmation link, then run `devflow login`.",
                style("Account created.").green(),
                style(&user.email).bold()
            );
        }
    }
    Ok(())
}

pub async fn logout(config: &AppConfig) -> Result<()> {
    if config.backend.mode == BackendMode::Remote {
        let auth = remote_auth(config)?;
        auth.sign_out().await;
    }
    if let Some(store) = session_store() {
        store
            .clear()
            .with_context(|| format!("remove {}", store.path().display()))?;
    }
    println!("{}", style("Signed out").green());
    Ok(())
}

fn remote_only(config: &AppConfig) -> Result<AuthManager> {
    if config.backend.mode == BackendMode::Memory {
        bail!("the in-memory backend has no accounts; configure a remote backend first");
    }
    remote_auth(config)
}

fn prompt_email(theme: &ColorfulTheme, config: &AppConfig) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme).with_prompt("E-mail");
    if let Some(email) = &config.auth.email {
        input = input.default(email.clone());
    }
    input.interact_text().context("read e-mail")
}

fn persist(session: &Session) -> Result<()> {
    match session_store() {
        Some(store) => store
            .save(session)
            .with_context(|| format!("save session to {}", store.path().display())),
        None => {
            warn!("no data directory; the session lasts for this run only");
            Ok(())
        }
    }
}
