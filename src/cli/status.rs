//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use tornboard::cache::SnapshotStorage;
use tornboard::config::AppConfig;
use tornboard::error::Result;
use tornboard::store::StateStore;

/// Show where configuration and state live and whether a key is set.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "tornboard Configuration Status".bold());

    let config_path = AppConfig::resolve_path(opts.config_ref())?;
    match AppConfig::load_from(&config_path) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();

            if opts.api_key.is_some() {
                println!("{} API key given on the command line", "✓".green());
            } else if config.credential().is_ok() {
                println!("{} API key configured", "✓".green());
            } else {
                println!("{} API key not configured", "✗".red());
                println!("  → Run 'tornboard init' to configure");
            }

            if let Some(host) = opts.api_host.as_ref().or(config.api_host.as_ref()) {
                println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
            }

            println!(
                "{} Request budget: {} calls/min, {}ms spacing",
                "○".dimmed(),
                config.queue.calls_per_minute,
                config.queue.inter_call_delay_ms
            );

            if config.bazaar.sellers.is_empty() {
                println!("{} Bazaar: your own", "○".dimmed());
            } else {
                println!("{} Bazaar sellers: {}", "○".dimmed(), config.bazaar.sellers.len());
            }

            let data_dir = config
                .data_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("{} Crawler data: {}", "○".dimmed(), data_dir);
        }
        Err(e) => {
            println!("{} Configuration not available: {}", "✗".red(), e);
            println!();
            println!("Run {} to create a configuration file.", "tornboard init".cyan());

            if let Ok(dir) = StateStore::data_dir() {
                println!("{} Crawler data: {}", "○".dimmed(), dir.display());
            }
        }
    }

    if let Ok(dir) = SnapshotStorage::cache_dir() {
        println!("{} Reference cache: {}", "○".dimmed(), dir.display());
    }
    println!();

    Ok(())
}
