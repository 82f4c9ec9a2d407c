//! Flipmart CLI - seed inspection, operator order tooling, and scripted sessions.
//!
//! Every run builds a fresh in-memory store from `--seed`, `FLIPMART_SEED_FILE`,
//! or the built-in demo dataset. Nothing persists between runs.
//!
//! # Usage
//!
//! ```bash
//! # Validate a seed file
//! fm-cli seed check data/store.yaml
//!
//! # Browse the catalog
//! fm-cli catalog products --category 2 --sort price-asc
//!
//! # Operator tooling
//! fm-cli orders list --view pending
//! fm-cli orders confirm OD333333333
//!
//! # Walk a customer through checkout
//! fm-cli simulate checkout --email john.doe@example.com --secret password --item 201:1
//! ```
//!
//! # Commands
//!
//! - `seed` - Validate or dump seed datasets
//! - `catalog` - List categories and products, quick search
//! - `orders` - Operator order list, transitions, dashboard
//! - `simulate` - Scripted customer sessions
//! - `recommend` - "You may also like" suggestions for a product

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flipmart_storefront::config::StorefrontConfig;

mod commands;

use commands::CliError;
use commands::orders::Transition;
use commands::seed::SeedFormat;
use commands::simulate::CheckoutScript;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "Flipmart CLI tools")]
struct Cli {
    /// Seed file to load instead of the configured one or the demo data
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate or dump seed datasets
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Operator order tooling
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Scripted customer sessions
    Simulate {
        #[command(subcommand)]
        action: SimulateAction,
    },
    /// Suggest related products
    Recommend {
        /// Product ID
        product_id: String,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Validate a seed file
    Check {
        /// Path to a JSON or YAML seed file
        file: PathBuf,
    },
    /// Write the demo dataset to stdout
    Dump {
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: SeedFormat,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List categories
    Categories,
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<i64>,

        /// Sort order (`newest`, `price-asc`, `price-desc`)
        #[arg(short, long, default_value = "newest")]
        sort: String,
    },
    /// Search product and category names
    Search {
        term: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders in an operator tab
    List {
        /// `all`, `pending`, `active`, or `completed`
        #[arg(short, long, default_value = "all")]
        view: String,
    },
    /// Confirm payment for a pending order
    Confirm { order_id: String },
    /// Reject payment for a pending order
    Reject { order_id: String },
    /// Set the fulfillment stage (`placed`, `dispatched`, `delivered`)
    Advance { order_id: String, status: String },
    /// Cancel a placed or dispatched order
    Cancel { order_id: String },
    /// Delete an order record
    Delete { order_id: String },
    /// Delete a customer and all of their orders
    RemoveCustomer { user_id: String },
    /// Show dashboard figures
    Dashboard,
}

#[derive(Subcommand)]
enum SimulateAction {
    /// Sign in, fill the cart, and place an order
    Checkout {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = "password")]
        secret: String,

        /// `PRODUCT_ID:QUANTITY`, repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Shipping address, defaults to the one on file
        #[arg(short, long)]
        address: Option<String>,

        /// Confirm payment as the operator afterwards
        #[arg(long)]
        confirm: bool,
    },
    /// Show a customer's orders with their progress
    Orders { user_id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,flipmart_storefront=debug".into());

    let json = std::env::var("FLIPMART_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_target(false)))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    let cli = Cli::parse();

    if let Err(e) = run(cli, &config).await {
        sentry::capture_error(&e);
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let seed = cli.seed.as_deref();

    match cli.command {
        Commands::Seed { action } => match action {
            SeedAction::Check { file } => commands::seed::check(&file)?,
            SeedAction::Dump { format } => commands::seed::dump(format)?,
        },
        Commands::Catalog { action } => {
            let store = commands::load_store(config, seed)?;
            match action {
                CatalogAction::Categories => commands::catalog::categories(&store).await,
                CatalogAction::Products { category, sort } => {
                    commands::catalog::products(&store, category, &sort).await?;
                }
                CatalogAction::Search { term } => commands::catalog::search(&store, &term).await,
            }
        }
        Commands::Orders { action } => {
            let store = commands::load_store(config, seed)?;
            let (order_id, transition) = match action {
                OrdersAction::List { view } => {
                    return commands::orders::list(&store, config, &view).await;
                }
                OrdersAction::RemoveCustomer { user_id } => {
                    let user_id = commands::parse_id(&user_id)?;
                    return commands::orders::remove_customer(&store, config, user_id).await;
                }
                OrdersAction::Dashboard => return commands::orders::dashboard(&store, config).await,
                OrdersAction::Confirm { order_id } => (order_id, Transition::Confirm),
                OrdersAction::Reject { order_id } => (order_id, Transition::Reject),
                OrdersAction::Advance { order_id, status } => (order_id, Transition::Advance(status)),
                OrdersAction::Cancel { order_id } => (order_id, Transition::Cancel),
                OrdersAction::Delete { order_id } => (order_id, Transition::Delete),
            };
            commands::orders::transition(&store, config, &order_id, transition).await?;
        }
        Commands::Simulate { action } => {
            let store = commands::load_store(config, seed)?;
            match action {
                SimulateAction::Checkout {
                    email,
                    secret,
                    items,
                    address,
                    confirm,
                } => {
                    let script = CheckoutScript {
                        email,
                        secret,
                        items,
                        address,
                        confirm,
                    };
                    commands::simulate::checkout(&store, config, &script).await?;
                }
                SimulateAction::Orders { user_id } => {
                    commands::simulate::customer_orders(&store, &user_id).await?;
                }
            }
        }
        Commands::Recommend { product_id } => {
            let store = commands::load_store(config, seed)?;
            commands::recommend::recommend(&store, config, &product_id).await?;
        }
    }
    Ok(())
}
