//! GoMarketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! gm-cli cart show
//!
//! # Add one unit of a product
//! gm-cli cart add --id a --title Shirt --image-url https://img/a.png --price 10
//!
//! # Adjust quantities
//! gm-cli cart increment a
//! gm-cli cart decrement a
//!
//! # Empty the cart
//! gm-cli cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATA_DIR` - Directory holding the cart file (default: `.gomarketplace`)
//! - `CART_STORAGE_KEY` - Key of the cart snapshot
//! - `CART_LEGACY_ADD_SNAPSHOT` - Persist the pre-add cart on `add`
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gomarketplace_core::{Decimal, ItemId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the stored cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents
    Show,
    /// Add one unit of a product
    Add {
        /// Product identifier
        #[arg(long, value_parser = ItemId::parse)]
        id: ItemId,

        /// Display name
        #[arg(long)]
        title: String,

        /// Image reference
        #[arg(long)]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Increase an item's quantity by one
    Increment {
        /// Product identifier
        #[arg(value_parser = ItemId::parse)]
        id: ItemId,
    },
    /// Decrease an item's quantity by one (no floor)
    Decrement {
        /// Product identifier
        #[arg(value_parser = ItemId::parse)]
        id: ItemId,
    },
    /// Remove every item
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=info,gm_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CommandError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                id,
                title,
                image_url,
                price,
            } => commands::cart::add(id, title, image_url, price).await?,
            CartAction::Increment { id } => commands::cart::increment(&id).await?,
            CartAction::Decrement { id } => commands::cart::decrement(&id).await?,
            CartAction::Clear => commands::cart::clear().await?,
        },
    }
    Ok(())
}
