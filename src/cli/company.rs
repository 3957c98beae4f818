//! Company command

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::output;
use tornboard::Result;
use tornboard::models::display::{EmployeeDisplay, FieldRow, format_money, format_number};
use tornboard::models::{CompanyDetailRecord, CompanyRecord};

/// Show the key owner's company
pub async fn show(ctx: &CommandContext, detailed: bool) -> Result<()> {
    let credential = ctx.credential()?;

    if !detailed {
        let company = ctx.dashboard.get_company_data(&credential).await?;
        return output::render(ctx.format, &company, &rows(&company), || print_company(&company));
    }

    let detail = ctx.dashboard.get_company_detailed_data(&credential).await?;
    match ctx.format {
        // The roster is the useful table; the profile fields are in pretty and JSON
        OutputFormat::Table => {
            let employees: Vec<EmployeeDisplay> = detail.employees.iter().map(EmployeeDisplay::from).collect();
            output::render(ctx.format, &detail, &employees, || {})
        }
        _ => output::render(ctx.format, &detail, &detail_rows(&detail), || print_detail(&detail)),
    }
}

fn rows(c: &CompanyRecord) -> Vec<FieldRow> {
    vec![
        FieldRow::new("ID", c.id),
        FieldRow::new("Name", &c.name),
        FieldRow::new("Type", &c.type_name),
        FieldRow::new("Rating", format!("{}/10", c.rating)),
        FieldRow::new("Director", c.director_id),
        FieldRow::new("Employees", format!("{}/{}", c.employees_hired, c.employees_capacity)),
        FieldRow::new("Daily income", format_money(c.daily_income)),
        FieldRow::new("Daily customers", format_number(c.daily_customers)),
        FieldRow::new("Weekly income", format_money(c.weekly_income)),
        FieldRow::new("Weekly customers", format_number(c.weekly_customers)),
        FieldRow::new("Age", format!("{} days", c.days_old)),
    ]
}

fn detail_rows(d: &CompanyDetailRecord) -> Vec<FieldRow> {
    let mut rows = rows(&d.company);
    rows.extend([
        FieldRow::new("Funds", format_money(d.funds)),
        FieldRow::new("Popularity", d.popularity),
        FieldRow::new("Efficiency", d.efficiency),
        FieldRow::new("Environment", d.environment),
        FieldRow::new("Trains", d.trains_available),
        FieldRow::new("Advertising", format_money(d.advertising_budget)),
        FieldRow::new("Online", format!("{}/{}", d.online_employees(), d.employees.len())),
    ]);
    rows
}

fn print_company(c: &CompanyRecord) {
    if c.is_none() {
        println!("{}", c.name.dimmed());
        return;
    }
    println!("{} [{}]  {}", c.name.bold(), c.id, c.type_name.cyan());
    println!(
        "Rating {}/10   Employees {}/{}   {} days old",
        c.rating, c.employees_hired, c.employees_capacity, c.days_old
    );
    println!(
        "Daily:  {} from {} customers",
        format_money(c.daily_income).green(),
        format_number(c.daily_customers)
    );
    println!(
        "Weekly: {} from {} customers",
        format_money(c.weekly_income).green(),
        format_number(c.weekly_customers)
    );
}

fn print_detail(d: &CompanyDetailRecord) {
    print_company(&d.company);
    if d.company.is_none() {
        return;
    }
    println!();
    println!(
        "Funds {}   Popularity {}   Efficiency {}   Environment {}   Trains {}",
        format_money(d.funds),
        d.popularity,
        d.efficiency,
        d.environment,
        d.trains_available
    );
    let employees: Vec<EmployeeDisplay> = d.employees.iter().map(EmployeeDisplay::from).collect();
    let title = format!("Employees: {} ({} online)", employees.len(), d.online_employees());
    if employees.is_empty() {
        println!("\n{}", title.bold());
    } else {
        println!("{}", output::table::format_section(&title, &employees));
    }
}
