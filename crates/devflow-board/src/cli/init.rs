/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When AppConfig schema changes
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use devflow_board::config::{AppConfig, BackendMode, DefaultView, default_config_path};

pub fn run_init(output: Option<PathBuf>) -> Result<()> {
    let output = output
        .or_else(default_config_path)
        .ok_or_else(|| anyhow!("no config directory on this platform; pass --output"))?;

    println!("{}", style("Welcome to DevFlow").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a configuration file.").dim()
    );

    let theme = ColorfulTheme::default();

    if output.exists() {
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(format!("{} exists. Overwrite?", output.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("{}", style("Nothing written.").yellow());
            return Ok(());
        }
    }

    let mut config = AppConfig::default();

    println!("\n{}", style("--- Backend ---").bold());
    let modes = ["remote (hosted store)", "memory (offline demo)"];
    let mode = Select::with_theme(&theme)
        .with_prompt("Backend")
        .items(&modes)
        .default(0)
        .interact()?;

    if mode == 0 {
        config.backend.mode = BackendMode::Remote;
        config.backend.url = Input::with_theme(&theme)
            .with_prompt("Project URL (e.g., https://xyz.supabase.co)")
            .validate_with(|value: &String| {
                url::Url::parse(value.trim())
                    .map(|_| ())
                    .map_err(|err| format!("not a URL: {err}"))
            })
            .interact_text()?;
        config.backend.anon_key = Input::with_theme(&theme)
            .with_prompt("Anon (public) API key")
            .interact_text()?;

        let email: String = Input::with_theme(&theme)
            .with_prompt("E-mail for sign in (optional)")
            .allow_empty(true)
            .interact_text()?;
        config.auth.email = Some(email.trim().to_string()).filter(|email| !email.is_empty());
    } else {
        config.backend.mode = BackendMode::Memory;
    }

    println!("\n{}", style("--- Interface ---").bold());
    let views = [DefaultView::Board, DefaultView::List, DefaultView::Stats];
    let labels = ["board", "list", "stats"];
    let view = Select::with_theme(&theme)
        .with_prompt("Start in view")
        .items(&labels)
        .default(0)
        .interact()?;
    config.ui.default_view = views[view];

    config.validate().context("generated configuration is invalid")?;
    let yaml = config.to_yaml().context("failed to serialize config to YAML")?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );
    if config.backend.mode == BackendMode::Remote {
        println!("Next: {}", style("devflow login").bold());
    }

    Ok(())
}
