//! Bazaar command

use std::io::Read;

use colored::Colorize;
use log::debug;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{BazaarArgs, CommandContext, OutputFormat, SellerCommands};
use crate::output;
use tornboard::config::{AppConfig, import_player_ids};
use tornboard::error::ConfigError;
use tornboard::models::BazaarItems;
use tornboard::models::display::{ListingDisplay, SellerDisplay};
use tornboard::{Error, Result};

/// Seller list after a change
#[derive(Debug, Default, Serialize)]
struct SellerReport {
    sellers: Vec<u64>,
    added: Vec<u64>,
    removed: usize,
}

/// List, filter and sort bazaar listings
pub async fn list(ctx: &CommandContext, args: &BazaarArgs) -> Result<()> {
    let result = ctx
        .dashboard
        .get_bazaar_listings(&ctx.credential()?, &args.filter())
        .await?;

    let rows: Vec<ListingDisplay> = result.items.iter().map(ListingDisplay::from).collect();
    output::render(ctx.format, &result, &rows, || print_pretty(&result, &rows))
}

fn print_pretty(result: &BazaarItems, rows: &[ListingDisplay]) {
    println!("{}", output::table::format_table(rows));
    if result.items.is_empty() {
        return;
    }

    let bargains = result
        .items
        .iter()
        .filter(|l| l.market_value > 0 && l.percent_below_market > 0.0)
        .count();
    println!(
        "{} listings, {} below market",
        result.items.len(),
        bargains.to_string().green()
    );
    println!("Categories: {}", result.categories.join(", ").dimmed());
}

/// Show or change the tracked sellers. Changes are written back to the
/// config file, which is created when missing.
pub fn sellers(opts: &GlobalOptions, cmd: &SellerCommands) -> Result<()> {
    let mut config = match AppConfig::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::NotFound)) => AppConfig::default(),
        Err(e) => return Err(e),
    };

    let mut report = SellerReport::default();
    match cmd {
        SellerCommands::List => {}
        SellerCommands::Add { ids } => report.added = config.bazaar.add_sellers(ids),
        SellerCommands::Remove { ids } => report.removed = config.bazaar.remove_sellers(ids),
        SellerCommands::Import { source } => {
            let ids = import_player_ids(&read_source(source)?);
            debug!("Found {} player ids in {}", ids.len(), source);
            report.added = config.bazaar.add_sellers(&ids);
        }
    }

    let changed = !report.added.is_empty() || report.removed > 0;
    if changed {
        config.save_at(opts.config_ref())?;
    }
    report.sellers = config.bazaar.sellers.clone();

    print_sellers(opts.format, cmd, &report)
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

fn seller_rows(report: &SellerReport) -> Vec<SellerDisplay> {
    report
        .sellers
        .iter()
        .map(|&id| SellerDisplay {
            id,
            note: if report.added.contains(&id) { "new".to_string() } else { String::new() },
        })
        .collect()
}

fn print_sellers(format: OutputFormat, cmd: &SellerCommands, report: &SellerReport) -> Result<()> {
    let rows = seller_rows(report);
    output::render(format, report, &rows, || {
        match cmd {
            SellerCommands::List => {}
            SellerCommands::Remove { .. } => {
                println!("{} Removed {} sellers\n", "✓".green(), report.removed);
            }
            SellerCommands::Add { .. } | SellerCommands::Import { .. } => {
                println!("{} Added {} sellers\n", "✓".green(), report.added.len());
            }
        }
        if report.sellers.is_empty() {
            println!("No tracked sellers; `tornboard bazaar` lists your own bazaar.");
        } else {
            println!("{}", output::table::format_table(&rows));
            println!("{} tracked sellers", report.sellers.len());
        }
    })
}
