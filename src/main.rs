//! ah-client - Albert Heijn product search CLI
//!
//! Searches the Albert Heijn catalog through its mobile GraphQL API.

use ah_client::ah::SortType;
use ah_client::commands::{PriceCommand, ProductCommand, SearchCommand};
use ah_client::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ah-client",
    version,
    about = "Albert Heijn product search CLI",
    long_about = "Search Albert Heijn products, look them up by id, or find products near a price."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AH_PROXY")]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for products
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Number of results to request
        #[arg(short, long)]
        limit: Option<u32>,

        /// Sort order (relevance, price-low, price-high, name-a-z, name-z-a)
        #[arg(short, long)]
        sort: Option<SortType>,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a product by id
    #[command(alias = "g")]
    Get {
        /// Webshop product id
        id: i64,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Find products priced near a target price
    #[command(alias = "p")]
    Price {
        /// Search query
        query: String,

        /// Target price in euros
        price: f64,

        /// Maximum distance from the target price
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported sort orders
    Sorts,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search { query, limit, sort, json } => {
            if limit.is_some() {
                config.page_size = limit;
            }
            if sort.is_some() {
                config.sort = sort;
            }
            if json {
                config.format = OutputFormat::Json;
            }

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Get { id, json } => {
            if json {
                config.format = OutputFormat::Json;
            }

            let cmd = ProductCommand::new(config);
            let output = cmd.execute(id).await?;
            println!("{}", output);
        }

        Commands::Price { query, price, tolerance, json } => {
            if json {
                config.format = OutputFormat::Json;
            }

            let cmd = PriceCommand::new(config);
            let tolerance = tolerance.unwrap_or_else(|| cmd.default_tolerance());
            let output = cmd.execute(&query, price, tolerance).await?;
            println!("{}", output);
        }

        Commands::Sorts => {
            println!("Supported sort orders:\n");
            println!("{:<12} {:<16}", "Name", "API value");
            println!("{:-<12} {:-<16}", "", "");

            for sort in SortType::all() {
                println!("{:<12} {:<16}", sort.to_string(), sort.as_api_str());
            }
        }
    }

    Ok(())
}
