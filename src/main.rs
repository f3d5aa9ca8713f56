mod cli;

use anyhow::Result;
use brewlog::config;
use brewlog::journal::{EntryId, SortCriterion};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brewlog", version, about = "Offline-first coffee shop journal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a coffee shop visit
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        /// What you ordered
        #[arg(long, default_value = "")]
        order: String,
        /// Price paid; anything unparsable counts as 0
        #[arg(long, default_value = "")]
        price: String,
        /// 1-5; anything else means not rated
        #[arg(long, default_value = "")]
        rating: String,
        #[arg(long, default_value = "")]
        review: String,
        /// Image file to attach
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Show all entries
    List,
    /// Show all entries ordered by price, rating or name
    Sort {
        #[arg(value_parser = parse_criterion)]
        by: SortCriterion,
    },
    /// Show entries whose name, address, order or review contains the text
    Search { query: String },
    /// Delete an entry
    Delete {
        #[arg(value_parser = parse_entry_id)]
        id: EntryId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print all entries as JSON
    Export,
    /// Manage the offline asset cache
    Assets {
        #[command(subcommand)]
        action: AssetsAction,
    },
    /// Serve static assets cache-first
    Serve,
}

#[derive(Subcommand)]
enum AssetsAction {
    /// Fetch and cache every configured asset
    Install,
}

fn parse_criterion(s: &str) -> Result<SortCriterion, String> {
    s.parse()
}

fn parse_entry_id(s: &str) -> Result<EntryId, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::BrewlogConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Add {
            name,
            address,
            order,
            price,
            rating,
            review,
            photo,
        } => {
            let form = cli::entries::AddForm {
                name,
                address,
                order,
                price,
                rating,
                review,
                photo,
            };
            cli::entries::add(&config, form).await?;
        }
        Command::List => cli::entries::list(&config).await?,
        Command::Sort { by } => cli::entries::sort(&config, by).await?,
        Command::Search { query } => cli::entries::search(&config, query).await?,
        Command::Delete { id, yes } => cli::entries::delete(&config, id, yes).await?,
        Command::Export => cli::export::export(&config).await?,
        Command::Assets { action } => match action {
            AssetsAction::Install => cli::assets::install(&config).await?,
        },
        Command::Serve => brewlog::server::serve(config).await?,
    }

    Ok(())
}
