//! Player command

use colored::Colorize;

use crate::cli::CommandContext;
use crate::output;
use tornboard::Result;
use tornboard::models::display::{FieldRow, format_money, format_number};
use tornboard::models::{BarRecord, PlayerRecord};

/// Show the key owner's profile, bars and battle stats
pub async fn show(ctx: &CommandContext) -> Result<()> {
    let player = ctx.dashboard.get_player_stats(&ctx.credential()?).await?;

    output::render(ctx.format, &player, &rows(&player), || print_pretty(&player))
}

fn bar(b: &BarRecord) -> String {
    format!("{}/{}", b.current, b.maximum)
}

fn stat(value: f64) -> String {
    format_number(value.round() as i64)
}

fn rows(p: &PlayerRecord) -> Vec<FieldRow> {
    vec![
        FieldRow::new("ID", p.id),
        FieldRow::new("Name", &p.name),
        FieldRow::new("Level", p.level),
        FieldRow::new("Rank", &p.rank),
        FieldRow::new("Age", format!("{} days", p.age_days)),
        FieldRow::new("Status", &p.status),
        FieldRow::new("Last action", &p.last_action),
        FieldRow::new("Life", bar(&p.life)),
        FieldRow::new("Energy", bar(&p.energy)),
        FieldRow::new("Nerve", bar(&p.nerve)),
        FieldRow::new("Happy", bar(&p.happy)),
        FieldRow::new("Money", format_money(p.money_on_hand)),
        FieldRow::new("Strength", stat(p.battle_stats.strength)),
        FieldRow::new("Defense", stat(p.battle_stats.defense)),
        FieldRow::new("Speed", stat(p.battle_stats.speed)),
        FieldRow::new("Dexterity", stat(p.battle_stats.dexterity)),
        FieldRow::new("Total", stat(p.battle_stats.total)),
        FieldRow::new("Company", format!("{} ({})", p.company_name, p.job_position)),
        FieldRow::new("Faction", format!("{} ({})", p.faction_name, p.faction_position)),
    ]
}

fn print_pretty(p: &PlayerRecord) {
    println!("{} [{}]  level {} {}", p.name.bold(), p.id, p.level, p.rank.dimmed());
    println!("{}  {}", p.status, p.last_action.dimmed());
    println!();
    println!(
        "Life {}   Energy {}   Nerve {}   Happy {}",
        bar(&p.life).green(),
        bar(&p.energy).yellow(),
        bar(&p.nerve).red(),
        bar(&p.happy).cyan()
    );
    println!("Money on hand: {}", format_money(p.money_on_hand).bold());
    println!();
    println!("{}", "Battle stats".bold());
    println!("  Strength   {:>18}", stat(p.battle_stats.strength));
    println!("  Defense    {:>18}", stat(p.battle_stats.defense));
    println!("  Speed      {:>18}", stat(p.battle_stats.speed));
    println!("  Dexterity  {:>18}", stat(p.battle_stats.dexterity));
    println!("  Total      {:>18}", stat(p.battle_stats.total).bold());
    println!();
    println!("Company: {} ({})", p.company_name, p.job_position);
    println!("Faction: {} ({})", p.faction_name, p.faction_position);
}
