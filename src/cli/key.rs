//! API key commands

use colored::Colorize;

use crate::cli::CommandContext;
use crate::output;
use tornboard::Result;
use tornboard::models::display::FieldRow;
use tornboard::models::{KeyCheck, KeyStatus};

/// Validate the configured key against the API
pub async fn check(ctx: &CommandContext) -> Result<()> {
    let check = ctx.dashboard.check_api_key(&ctx.credential()?).await?;

    output::render(ctx.format, &check, &rows(&check), || print_pretty(&check))
}

fn rows(check: &KeyCheck) -> Vec<FieldRow> {
    let mut rows = vec![FieldRow::new("Status", check.status)];
    if check.is_valid() {
        rows.push(FieldRow::new("Player", &check.name));
        rows.push(FieldRow::new("Player ID", check.player_id));
    }
    if let Some(error) = &check.error {
        rows.push(FieldRow::new("Error", error));
    }
    rows
}

fn print_pretty(check: &KeyCheck) {
    match check.status {
        KeyStatus::Valid => println!(
            "{} Key is valid: {} [{}]",
            "✓".green(),
            check.name.bold(),
            check.player_id
        ),
        KeyStatus::Limited => println!(
            "{} Key is rate limited: {}",
            "⚠".yellow(),
            check.error.as_deref().unwrap_or_default()
        ),
        KeyStatus::Invalid => println!(
            "{} Key is invalid: {}",
            "✗".red(),
            check.error.as_deref().unwrap_or_default()
        ),
    }
}
