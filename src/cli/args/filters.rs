//! Filter and settings arguments

use clap::Args;

use tornboard::crawler::CrawlerConfigUpdate;
use tornboard::models::{BazaarFilter, BazaarSort};
use tornboard::store::PlayerSearch;

/// Bazaar listing filters
#[derive(Debug, Clone, Args, Default)]
pub struct BazaarArgs {
    /// Only this category ("All" for every category)
    #[arg(long)]
    pub category: Option<String>,

    /// Item or seller name substring (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<i64>,

    /// Sort order: price_asc, price_desc, quantity_desc, value
    #[arg(long, default_value = "price_asc")]
    pub sort: BazaarSort,
}

impl BazaarArgs {
    pub fn filter(&self) -> BazaarFilter {
        BazaarFilter {
            category: self.category.clone(),
            search: self.search.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort,
        }
    }
}

/// Crawler settings; omitted flags keep their current value
#[derive(Debug, Clone, Args, Default)]
pub struct CrawlerConfigArgs {
    /// Run on a schedule
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Minutes between batches
    #[arg(long)]
    pub interval_minutes: Option<u32>,

    /// First player id to scan
    #[arg(long)]
    pub range_start: Option<u64>,

    /// Last player id to scan
    #[arg(long)]
    pub range_end: Option<u64>,

    /// Pause between units in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Ids per batch
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Ids fetched together
    #[arg(long)]
    pub max_concurrency: Option<u32>,
}

impl CrawlerConfigArgs {
    pub fn update(&self) -> CrawlerConfigUpdate {
        CrawlerConfigUpdate {
            enabled: self.enabled,
            interval_minutes: self.interval_minutes,
            range_start: self.range_start,
            range_end: self.range_end,
            request_delay_ms: self.delay_ms,
            batch_size: self.batch_size,
            max_concurrency: self.max_concurrency,
        }
    }
}

/// Player index search
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Name substring (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub min_level: Option<u32>,

    #[arg(long)]
    pub max_level: Option<u32>,

    /// Only players without a job
    #[arg(long)]
    pub no_company: bool,

    /// Only factionless players
    #[arg(long)]
    pub no_faction: bool,

    /// Maximum results
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

impl SearchArgs {
    pub fn search(&self) -> PlayerSearch {
        PlayerSearch {
            name: self.name.clone(),
            min_level: self.min_level,
            max_level: self.max_level,
            no_company: self.no_company,
            no_faction: self.no_faction,
            limit: self.limit,
        }
    }
}
