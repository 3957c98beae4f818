//! tornboard CLI - Torn dashboard and player index from the command line

use clap::Parser;

mod cli;
mod output;

use cli::args::GlobalOptions;
use cli::{
    BazaarCommand, BazaarSubcommand, CacheCommands, Cli, CommandContext, Commands, CrawlerCommands, KeyCommands,
};
use tornboard::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Warnings by default, debug with `--debug`; `RUST_LOG` wins over both.
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("tornboard version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(opts.format),
            CacheCommands::Clear => cli::cache::clear(opts.format),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Key(KeyCommands::Check) => cli::key::check(&CommandContext::new(&opts)?).await,
        Commands::Player => cli::player::show(&CommandContext::new(&opts)?).await,
        Commands::Company { detailed } => cli::company::show(&CommandContext::new(&opts)?, detailed).await,
        Commands::Faction { detailed } => cli::faction::show(&CommandContext::new(&opts)?, detailed).await,
        Commands::Bazaar(BazaarCommand { command: Some(BazaarSubcommand::Sellers(cmd)), .. }) => {
            cli::bazaar::sellers(&opts, &cmd)
        }
        Commands::Bazaar(BazaarCommand { command: None, list }) => {
            cli::bazaar::list(&CommandContext::new(&opts)?, &list).await
        }
        Commands::Crawler(cmd) => {
            let ctx = CommandContext::new(&opts)?;
            match cmd {
                CrawlerCommands::Status { detailed } => cli::crawler::status(&ctx, detailed),
                CrawlerCommands::Config(args) => cli::crawler::config(&ctx, &args),
                CrawlerCommands::Batch => cli::crawler::batch(&ctx).await,
                CrawlerCommands::Run => cli::crawler::run(&ctx).await,
                CrawlerCommands::Log { limit } => cli::crawler::log(&ctx, limit),
                CrawlerCommands::Runs { limit } => cli::crawler::runs(&ctx, limit),
                CrawlerCommands::Search(args) => cli::crawler::search(&ctx, &args),
            }
        }
    }
}
