//! Faction command

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::output;
use tornboard::Result;
use tornboard::models::display::{FieldRow, MemberDisplay, WarDisplay, format_number};
use tornboard::models::{FactionDetailRecord, FactionRecord};

/// Show the key owner's faction
pub async fn show(ctx: &CommandContext, detailed: bool) -> Result<()> {
    let credential = ctx.credential()?;

    if !detailed {
        let faction = ctx.dashboard.get_faction_data(&credential).await?;
        return output::render(ctx.format, &faction, &rows(&faction), || print_faction(&faction));
    }

    let detail = ctx.dashboard.get_faction_detailed_data(&credential).await?;
    match ctx.format {
        OutputFormat::Table => {
            let members: Vec<MemberDisplay> = detail.members.iter().map(MemberDisplay::from).collect();
            output::render(ctx.format, &detail, &members, || {})
        }
        _ => output::render(ctx.format, &detail, &detail_rows(&detail), || print_detail(&detail)),
    }
}

fn rows(f: &FactionRecord) -> Vec<FieldRow> {
    vec![
        FieldRow::new("ID", f.id),
        FieldRow::new("Name", &f.name),
        FieldRow::new("Tag", &f.tag),
        FieldRow::new("Leader", f.leader_id),
        FieldRow::new("Co-leader", f.co_leader_id),
        FieldRow::new("Respect", format_number(f.respect)),
        FieldRow::new("Members", format!("{}/{}", f.member_count, f.capacity)),
        FieldRow::new("Best chain", f.best_chain),
        FieldRow::new("Age", format!("{} days", f.age_days)),
    ]
}

fn detail_rows(d: &FactionDetailRecord) -> Vec<FieldRow> {
    let mut rows = rows(&d.faction);
    rows.extend([
        FieldRow::new("Online", d.online_members),
        FieldRow::new("Active wars", d.active_wars.len()),
        FieldRow::new("Completed wars", d.completed_wars.len()),
        FieldRow::new("Territories", d.territory_count),
        FieldRow::new("Territory respect", format_number(d.territory_respect)),
    ]);
    rows
}

fn print_faction(f: &FactionRecord) {
    if f.is_none() {
        println!("{}", f.name.dimmed());
        return;
    }
    println!("{} [{}]  {}", f.name.bold(), f.id, f.tag.cyan());
    println!(
        "Respect {}   Members {}/{}   Best chain {}   {} days old",
        format_number(f.respect),
        f.member_count,
        f.capacity,
        f.best_chain,
        f.age_days
    );
}

fn print_detail(d: &FactionDetailRecord) {
    print_faction(&d.faction);
    if d.faction.is_none() {
        return;
    }
    println!(
        "Online {}   Territories {} ({} respect/day)",
        d.online_members,
        d.territory_count,
        format_number(d.territory_respect)
    );

    let active: Vec<WarDisplay> = d.active_wars.iter().map(WarDisplay::from).collect();
    let completed: Vec<WarDisplay> = d.completed_wars.iter().map(WarDisplay::from).collect();
    let members: Vec<MemberDisplay> = d.members.iter().map(MemberDisplay::from).collect();
    for section in [
        output::table::format_section("Active ranked wars", &active),
        output::table::format_section("Completed ranked wars", &completed),
        output::table::format_section("Members", &members),
    ] {
        if !section.is_empty() {
            println!("{}", section);
        }
    }
}
