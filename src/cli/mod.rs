//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

pub mod args;
pub mod bazaar;
pub mod cache;
pub mod company;
pub mod context;
pub mod crawler;
pub mod faction;
pub mod init;
pub mod key;
pub mod player;
pub mod status;

pub use args::{BazaarArgs, CrawlerConfigArgs, OutputFormat, SearchArgs};
pub use context::CommandContext;

/// tornboard - Torn dashboard and player index from the command line
#[derive(Parser, Debug)]
#[command(name = "tornboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "TORNBOARD_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "TORNBOARD_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// API key (overrides the config file)
    #[arg(long, global = true, env = "TORNBOARD_API_KEY", hide_env = true)]
    pub api_key: Option<String>,

    /// API host (for testing against a mock server)
    #[arg(long, global = true, env = "TORNBOARD_API_HOST", hide = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "TORNBOARD_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up the API key
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// API key commands
    #[command(subcommand)]
    Key(KeyCommands),

    /// Your profile, bars and battle stats
    Player,

    /// Your company
    Company {
        /// Include director figures and the full roster
        #[arg(long)]
        detailed: bool,
    },

    /// Your faction
    Faction {
        /// Include members, ranked wars and territory
        #[arg(long)]
        detailed: bool,
    },

    /// Bazaar listings of the tracked sellers
    Bazaar(BazaarCommand),

    /// Player index crawler
    #[command(subcommand)]
    Crawler(CrawlerCommands),

    /// Manage the reference data cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Validate the configured key
    Check,
}

/// `bazaar [filters]` lists; `bazaar sellers ...` manages the seller list
#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct BazaarCommand {
    #[command(subcommand)]
    pub command: Option<BazaarSubcommand>,

    #[command(flatten)]
    pub list: BazaarArgs,
}

#[derive(Subcommand, Debug)]
pub enum BazaarSubcommand {
    /// Manage the tracked sellers
    #[command(subcommand)]
    Sellers(SellerCommands),
}

#[derive(Subcommand, Debug)]
pub enum SellerCommands {
    /// Show the tracked sellers
    List,

    /// Track sellers by player id
    Add {
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Stop tracking sellers
    Remove {
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Track every player id found in a text or CSV file ("-" reads stdin)
    Import {
        source: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CrawlerCommands {
    /// Show crawler state and progress
    Status {
        /// Include progress estimates and recent activity
        #[arg(long)]
        detailed: bool,
    },

    /// Show or change crawler settings
    Config(CrawlerConfigArgs),

    /// Run one batch now
    Batch,

    /// Run the scheduler in the foreground until Ctrl-C
    Run,

    /// Show recent crawler activity
    Log {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show recent crawl runs
    Runs {
        /// Maximum runs to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Search the player index
    Search(SearchArgs),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cached reference data
    Status,

    /// Clear cached reference data
    Clear,

    /// Print the cache directory
    Path,
}
