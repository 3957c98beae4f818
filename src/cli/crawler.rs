//! Player index crawler commands

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::cli::{CommandContext, CrawlerConfigArgs, SearchArgs};
use crate::output;
use tornboard::Result;
use tornboard::crawler::{BatchOutcome, Crawler, CrawlerConfig, CrawlerStatus, DetailedStatus, RunState};
use tornboard::models::display::{
    CrawlLogDisplay, CrawlRunDisplay, FieldRow, IndexedPlayerDisplay, format_number, format_time,
};

/// How often `crawler run` refreshes its progress line
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Show crawler state and progress
pub fn status(ctx: &CommandContext, detailed: bool) -> Result<()> {
    let crawler = ctx.crawler(false)?;
    crawler.restore()?;

    if detailed {
        let detail = crawler.get_detailed_status()?;
        return output::render(ctx.format, &detail, &detail_rows(&detail), || print_detail(&detail));
    }

    let status = crawler.get_status();
    output::render(ctx.format, &status, &status_rows(&status), || print_status(&status))
}

/// Show settings, or apply the given changes
pub fn config(ctx: &CommandContext, args: &CrawlerConfigArgs) -> Result<()> {
    let crawler = ctx.crawler(false)?;
    let current = crawler.restore()?;

    let update = args.update();
    let config = if update.is_empty() {
        current
    } else {
        let merged = crawler.update_config(&update)?;
        // Nothing runs in this process; `crawler run` picks the change up
        crawler.shutdown();
        merged
    };

    output::render(ctx.format, &config, &config_rows(&config), || {
        if !update.is_empty() {
            println!("{} Crawler settings saved\n", "✓".green());
        }
        print_config(&config);
    })
}

/// Run one batch in the foreground
pub async fn batch(ctx: &CommandContext) -> Result<()> {
    let crawler = ctx.crawler(true)?;
    crawler.restore()?;

    let spinner = spinner(&format!("Crawling from {}...", crawler.get_status().current_position));
    let outcome = crawler.run_once().await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    output::render(ctx.format, &outcome, &batch_rows(&outcome), || print_batch(&outcome))
}

/// Keep the scheduler alive until Ctrl-C, or until a disabled crawler has
/// finished its batch. Ctrl-C pauses and waits for the current batch to
/// record where it stopped before exiting.
pub async fn run(ctx: &CommandContext) -> Result<()> {
    let crawler = ctx.crawler(true)?;
    crawler.initialize()?;
    if crawler.get_status().next_run.is_none() {
        crawler.start()?;
    }

    let spinner = spinner("Starting crawler...");
    let stopped_by_user = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, pausing crawler");
                crawler.pause();
                if crawler.is_running() {
                    spinner.set_message("Pausing after the requests in flight...".to_string());
                }
                crawler.stopped().await;
                break true;
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                let status = crawler.get_status();
                spinner.set_message(progress_line(&status));
                if finished(&crawler, &status) {
                    break false;
                }
            }
        }
    };
    spinner.finish_and_clear();

    let status = crawler.get_status();
    if stopped_by_user {
        println!("{} Crawler paused at {}", "⏸".yellow(), status.current_position);
    } else {
        println!("{} Crawler idle at {}", "✓".green(), status.current_position);
    }
    if let Some(error) = &status.last_error {
        println!("{} Last batch failed: {}", "✗".red(), error);
    }
    Ok(())
}

/// Show recent activity, newest first
pub fn log(ctx: &CommandContext, limit: usize) -> Result<()> {
    let crawler = ctx.crawler(false)?;
    crawler.restore()?;

    let entries: Vec<_> = crawler.get_log().into_iter().take(limit).collect();
    let rows: Vec<CrawlLogDisplay> = entries.iter().map(CrawlLogDisplay::from).collect();
    output::render(ctx.format, &entries, &rows, || {
        println!("{}", output::table::format_table(&rows))
    })
}

/// Show recent crawl runs, newest first
pub fn runs(ctx: &CommandContext, limit: usize) -> Result<()> {
    let store = ctx.state_store()?;
    let runs = store.recent_runs(limit)?;

    let rows: Vec<CrawlRunDisplay> = runs.iter().map(CrawlRunDisplay::from).collect();
    output::render(ctx.format, &runs, &rows, || {
        println!("{}", output::table::format_table(&rows))
    })
}

/// Query the player index
pub fn search(ctx: &CommandContext, args: &SearchArgs) -> Result<()> {
    let store = ctx.state_store()?;
    let players = store.search_players(&args.search())?;

    let rows: Vec<IndexedPlayerDisplay> = players.iter().map(IndexedPlayerDisplay::from).collect();
    output::render(ctx.format, &players, &rows, || {
        println!("{}", output::table::format_table(&rows));
        if !players.is_empty() {
            println!("{} players", players.len());
        }
    })
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn finished(crawler: &Crawler, status: &CrawlerStatus) -> bool {
    !crawler.config().enabled && status.state != RunState::Running && status.next_run.is_none()
}

fn progress_line(s: &CrawlerStatus) -> String {
    match s.state {
        RunState::Running => format!(
            "Crawling at {} ({} indexed, {:.1} ids/min)",
            s.current_position, s.indexed_count, s.crawl_speed
        ),
        _ => format!(
            "{} at {}, next batch {}",
            s.state,
            s.current_position,
            format_time(s.next_run)
        ),
    }
}

fn status_rows(s: &CrawlerStatus) -> Vec<FieldRow> {
    vec![
        FieldRow::new("State", s.state),
        FieldRow::new("Position", s.current_position),
        FieldRow::new("Indexed", format_number(s.indexed_count as i64)),
        FieldRow::new("Range size", format_number(s.total_count as i64)),
        FieldRow::new("Speed", format!("{:.1} ids/min", s.crawl_speed)),
        FieldRow::new("Last run", format_time(s.last_run)),
        FieldRow::new("Next run", format_time(s.next_run)),
        FieldRow::new("Last error", s.last_error.as_deref().unwrap_or("-")),
    ]
}

fn detail_rows(d: &DetailedStatus) -> Vec<FieldRow> {
    let mut rows = status_rows(&d.status);
    rows.extend([
        FieldRow::new("Remaining", format_number(d.remaining as i64)),
        FieldRow::new("Progress", format!("{:.2}%", d.progress_percent)),
        FieldRow::new(
            "ETA",
            d.eta_minutes
                .map(|m| format!("{:.0} min", m))
                .unwrap_or_else(|| "-".to_string()),
        ),
        FieldRow::new("Completion", format_time(d.estimated_completion)),
        FieldRow::new("Distinct players", format_number(d.distinct_players as i64)),
    ]);
    rows
}

fn config_rows(c: &CrawlerConfig) -> Vec<FieldRow> {
    vec![
        FieldRow::new("Enabled", c.enabled),
        FieldRow::new("Interval", format!("{} min", c.interval_minutes)),
        FieldRow::new("Range", format!("{}..={}", c.range_start, c.range_end)),
        FieldRow::new("Delay", format!("{} ms", c.request_delay_ms)),
        FieldRow::new("Batch size", c.batch_size),
        FieldRow::new("Concurrency", c.max_concurrency),
    ]
}

fn batch_rows(b: &BatchOutcome) -> Vec<FieldRow> {
    vec![
        FieldRow::new("Start", b.start_position),
        FieldRow::new("Next", b.end_position),
        FieldRow::new("Processed", b.processed),
        FieldRow::new("Indexed", b.indexed),
        FieldRow::new("Skipped", b.skipped),
        FieldRow::new("Failed", b.failed),
        FieldRow::new("Wrapped", b.wrapped),
    ]
}

fn state_label(state: RunState) -> colored::ColoredString {
    match state {
        RunState::Idle => "idle".normal(),
        RunState::Running => "running".green(),
        RunState::Paused => "paused".yellow(),
        RunState::Error => "error".red(),
    }
}

fn print_status(s: &CrawlerStatus) {
    println!("Crawler: {}", state_label(s.state).bold());
    println!(
        "Position {}   Indexed {}   Range {}",
        s.current_position,
        format_number(s.indexed_count as i64),
        format_number(s.total_count as i64)
    );
    println!("Last run: {}   Next run: {}", format_time(s.last_run), format_time(s.next_run));
    if let Some(error) = &s.last_error {
        println!("{} {}", "Last error:".red(), error);
    }
}

fn print_detail(d: &DetailedStatus) {
    print_status(&d.status);
    println!();
    println!(
        "Progress {:.2}%   Remaining {}   Speed {:.1} ids/min",
        d.progress_percent,
        format_number(d.remaining as i64),
        d.status.crawl_speed
    );
    if let Some(eta) = d.eta_minutes {
        println!("ETA {:.0} min (around {})", eta, format_time(d.estimated_completion));
    }
    println!("Players in index: {}", format_number(d.distinct_players as i64));

    let rows: Vec<CrawlLogDisplay> = d.recent_log.iter().map(CrawlLogDisplay::from).collect();
    if !rows.is_empty() {
        println!("{}", output::table::format_section("Recent activity", &rows));
    }
}

fn print_config(c: &CrawlerConfig) {
    let enabled = if c.enabled { "enabled".green() } else { "disabled".dimmed() };
    println!("Crawler {} every {} min", enabled, c.interval_minutes);
    println!("Range {}..={}", c.range_start, c.range_end);
    println!(
        "Batch {} ids, {} at a time, {} ms apart",
        c.batch_size, c.max_concurrency, c.request_delay_ms
    );
}

fn print_batch(b: &BatchOutcome) {
    println!(
        "{} Processed {} ids from {}: {} indexed, {} skipped, {} failed",
        "✓".green(),
        b.processed,
        b.start_position,
        b.indexed,
        b.skipped,
        b.failed
    );
    if b.wrapped {
        println!("Reached the end of the range, starting over at {}", b.end_position);
    } else {
        println!("Next batch starts at {}", b.end_position);
    }
}
