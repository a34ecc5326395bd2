//! Catfood CLI - catalog queries and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List dry food for kittens, cheapest first
//! catfood products --category dry --age kitten --sort price_asc
//!
//! # Show breed groups as the home page would
//! catfood groups
//!
//! # Work offline against a saved catalog export
//! catfood --catalog-file products.json products --breed persian
//!
//! # Add a product to the persisted cart and show it
//! catfood cart add 7
//! catfood cart show
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Catalog API base URL (unless `--catalog-file` is given)
//! - `CATALOG_API_TOKEN` - Optional bearer token
//! - `CART_DATA_DIR` - Cart directory (default: data)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CatalogArgs, CliError};

#[derive(Parser)]
#[command(name = "catfood")]
#[command(author, version, about = "Cat food storefront CLI tools")]
struct Cli {
    /// Read the catalog from a JSON file instead of the catalog API
    #[arg(long, global = true)]
    catalog_file: Option<PathBuf>,

    /// Directory holding the persisted cart
    #[arg(long, global = true, env = "CART_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with optional filters and sort
    Products {
        /// Category code (dry, wet, snack)
        #[arg(short, long)]
        category: Option<String>,

        /// Age group codes (kitten, adult, `special_care`)
        #[arg(short, long, value_delimiter = ',')]
        age: Vec<String>,

        /// Health tags (case-insensitive)
        #[arg(long, value_delimiter = ',')]
        health: Vec<String>,

        /// Breed tags
        #[arg(short, long, value_delimiter = ',')]
        breed: Vec<String>,

        /// Sort order (`price_asc`, `price_desc`, newest)
        #[arg(short, long, default_value = "")]
        sort: String,
    },
    /// Show breed groups and new arrivals
    Groups,
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents and totals
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Catalog product ID
        product_id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing (stderr, so JSON output on stdout stays clean)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let catalog_file = cli.catalog_file.as_deref();

    match cli.command {
        Commands::Products {
            category,
            age,
            health,
            breed,
            sort,
        } => {
            let args = CatalogArgs {
                category,
                age,
                health,
                breed,
                sort,
            };
            let catalog = commands::open_catalog(catalog_file)?;
            commands::catalog::products(catalog.as_ref(), &args).await?;
        }
        Commands::Groups => {
            let catalog = commands::open_catalog(catalog_file)?;
            commands::catalog::groups(catalog.as_ref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&cli.data_dir).await?,
            CartAction::Add { product_id } => {
                let catalog = commands::open_catalog(catalog_file)?;
                commands::cart::add(catalog.as_ref(), &cli.data_dir, product_id.into()).await?;
            }
        },
    }
    Ok(())
}
