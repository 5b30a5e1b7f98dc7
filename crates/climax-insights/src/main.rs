//! # climax-insights CLI
//!
//! ## Usage
//! ```bash
//! # Demand predictions for every stock-tracked product
//! climax-insights --sales sales.json --products products.json predict
//!
//! # One product, as JSON
//! climax-insights --json predict --product aguila
//!
//! # Today's totals, with the Nequi sales listed
//! climax-insights summary --method nequi
//!
//! # Close the day counting 350.000 in the drawer
//! climax-insights close --actual-cash 350000 --notes "cambio de turno"
//!
//! # Products at or below their minimum stock
//! climax-insights low-stock
//! ```
//!
//! ## Logging
//! Controlled by `RUST_LOG`, default `info,climax=debug`. Logs go to stderr so
//! `--json` output stays clean.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use climax_core::{Money, PaymentMethod};
use climax_insights::commands;
use climax_insights::snapshot::{load_products, load_sales};
use climax_insights::{InsightsConfig, InsightsResult};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "climax-insights",
    about = "Demand forecasting and sales reports for the CLIMAX bar",
    version
)]
struct Cli {
    #[arg(long, global = true, help = "Config file (default: platform config dir)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Sales snapshot (JSON array)")]
    sales: Option<PathBuf>,
    #[arg(long, global = true, help = "Products snapshot (JSON array)")]
    products: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Demand predictions and suggested reorders
    Predict {
        #[arg(long, help = "Only this product id")]
        product: Option<String>,
    },
    /// Totals, payment breakdown and today's top products
    Summary {
        #[arg(long, help = "List the sales paid with this method (efectivo, nequi, datafono)")]
        method: Option<PaymentMethod>,
    },
    /// Close the day and print the report
    Close {
        #[arg(long, help = "Cash counted in the drawer, in pesos")]
        actual_cash: Option<i64>,
        #[arg(long, help = "Notes attached to the cash count")]
        notes: Option<String>,
    },
    /// Products at or below their minimum stock
    LowStock,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> InsightsResult<String> {
    let mut config = InsightsConfig::load(cli.config)?;
    if let Some(path) = cli.sales {
        config.data.sales_path = path;
    }
    if let Some(path) = cli.products {
        config.data.products_path = path;
    }
    debug!(?config, "Configuration resolved");

    let now = Local::now();

    match cli.command {
        Commands::Predict { product } => {
            let products = load_products(&config.data.products_path)?;
            let sales = load_sales(&config.data.sales_path)?;
            let rows = commands::predict(&config, &products, &sales, &now, product.as_deref())?;
            if cli.json {
                commands::to_json(&rows)
            } else {
                Ok(commands::render_predictions(&rows))
            }
        }
        Commands::Summary { method } => {
            let products = load_products(&config.data.products_path)?;
            let sales = load_sales(&config.data.sales_path)?;
            let summary = commands::summary(&config, &products, &sales, &now, method);
            if cli.json {
                commands::to_json(&summary)
            } else {
                Ok(commands::render_summary(&summary, &products))
            }
        }
        Commands::Close { actual_cash, notes } => {
            let products = load_products(&config.data.products_path)?;
            let sales = load_sales(&config.data.sales_path)?;
            let report = commands::close(
                &sales,
                &now,
                actual_cash.map(Money::from_units),
                notes.as_deref(),
            )?;
            if cli.json {
                commands::to_json(&report)
            } else {
                Ok(commands::render_report(&report, &products))
            }
        }
        Commands::LowStock => {
            let products = load_products(&config.data.products_path)?;
            let low = commands::low_stock(&products);
            if cli.json {
                commands::to_json(&low)
            } else {
                Ok(commands::render_low_stock(&low))
            }
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - ERROR: Failed commands
/// - WARN: Skipped snapshot records, ignored env overrides
/// - INFO: Config and snapshot loading, day closing
/// - DEBUG: Per-product predictions, aggregation details
///
/// ## Configuration
/// Set `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - All debug logs
/// - `RUST_LOG=climax_core=debug` - Only forecasting/aggregation logs
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,climax=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
