//! Reference cache management commands

use chrono::Utc;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::output;
use tornboard::Result;
use tornboard::cache::storage::SnapshotStats;
use tornboard::cache::{CacheTtl, SnapshotStorage};
use tornboard::models::display::CacheDisplay;

#[derive(Debug, Serialize)]
struct CacheReport {
    path: String,
    total_size_bytes: usize,
    total_size_human: String,
    snapshots: Vec<CacheDisplay>,
}

#[derive(Debug, Serialize)]
struct ClearReport {
    entries_removed: usize,
    success: bool,
}

/// A snapshot is fresh for one reference TTL after it was fetched
fn is_fresh(stats: &SnapshotStats) -> bool {
    (Utc::now() - stats.updated_at)
        .to_std()
        .map(|age| age < CacheTtl::REFERENCE)
        .unwrap_or(true)
}

/// Show the stored reference snapshots
pub fn status(format: OutputFormat) -> Result<()> {
    let storage = SnapshotStorage::open()?;
    let stats = storage.stats()?;

    let snapshots: Vec<CacheDisplay> = stats.iter().map(|s| CacheDisplay::new(s, is_fresh(s))).collect();
    let total: usize = stats.iter().map(|s| s.size_bytes).sum();
    let report = CacheReport {
        path: storage.path().display().to_string(),
        total_size_bytes: total,
        total_size_human: format_size(total),
        snapshots,
    };

    output::render(format, &report, &report.snapshots, || {
        println!("Reference Cache");
        println!("────────────────────────────────────────");
        println!("Location:    {}", report.path);
        println!("Snapshots:   {}", report.snapshots.len());
        println!("Total size:  {}", report.total_size_human);
        if !report.snapshots.is_empty() {
            println!();
            println!("{}", output::table::format_table(&report.snapshots));
        }
    })
}

/// Remove every stored snapshot; the next lookup refetches
pub fn clear(format: OutputFormat) -> Result<()> {
    let storage = SnapshotStorage::open()?;
    let stats = storage.clear_all()?;

    match format {
        OutputFormat::Json => {
            let report = ClearReport {
                entries_removed: stats.entries_removed,
                success: true,
            };
            println!("{}", output::json::format_json(&report)?);
        }
        _ => {
            if stats.entries_removed > 0 {
                println!("Cleared {} cached snapshots", stats.entries_removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Print the cache directory
pub fn path() -> Result<()> {
    println!("{}", SnapshotStorage::cache_dir()?.display());
    Ok(())
}

/// Format bytes as human-readable size
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
