//! Init command implementation

use std::sync::Arc;

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use tornboard::cache::{company_types, item_catalog};
use tornboard::client::torn::DEFAULT_TIMEOUT;
use tornboard::client::{Credential, QueueSettings, RequestQueue, TornApi, TornClient};
use tornboard::config::AppConfig;
use tornboard::dashboard::Dashboard;
use tornboard::error::{ConfigError, Result};
use tornboard::models::KeyStatus;

/// Prompt for an API key, validate it and save it to the config file.
///
/// An existing config keeps its other settings; only the key (and the host
/// when `--api-host` is given) is replaced.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to tornboard!".bold().green());
    println!("Let's set up your Torn API key.\n");

    let api_key = match &opts.api_key {
        Some(key) => key.clone(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your Torn API key")
            .interact()?,
    };

    println!("\n{}", "Checking key...".cyan());
    let api: Arc<dyn TornApi> = Arc::new(TornClient::with_host(
        RequestQueue::new(QueueSettings::default()),
        opts.api_host.as_deref(),
        DEFAULT_TIMEOUT,
    )?);
    let dashboard = Dashboard::new(
        api.clone(),
        Arc::new(item_catalog(api.clone(), None)),
        Arc::new(company_types(api, None)),
    );

    let check = dashboard.check_api_key(&Credential::new(api_key.trim())).await?;
    match check.status {
        KeyStatus::Valid => {
            println!("{} Key belongs to {} [{}]", "✓".green(), check.name.bold(), check.player_id);
        }
        KeyStatus::Limited => {
            println!(
                "{} Key could not be checked right now ({}), saving it anyway",
                "⚠".yellow(),
                check.error.as_deref().unwrap_or_default()
            );
        }
        KeyStatus::Invalid => {
            return Err(ConfigError::Invalid(format!(
                "API key rejected: {}",
                check.error.as_deref().unwrap_or_default()
            ))
            .into());
        }
    }

    let mut config = AppConfig::load_at(opts.config_ref()).unwrap_or_default();
    config.api_key = Some(api_key.trim().to_string());
    if let Some(host) = &opts.api_host {
        config.api_host = Some(host.clone());
    }
    config.save_at(opts.config_ref())?;

    let config_path = AppConfig::resolve_path(opts.config_ref())?;
    println!("\n{} Configuration saved to: {}", "✓".green(), config_path.display());

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Your profile and bars", "tornboard player".cyan());
    println!("  {} - Bazaar listings", "tornboard bazaar".cyan());
    println!("  {} - Player index crawler", "tornboard crawler status".cyan());

    Ok(())
}
