//! Command-line entry point for the arbitrage position sizer.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arb_sizer::config::{AppConfig, Config};
use arb_sizer::metrics;
use arb_sizer::scanner::{load_quotes, scan, size_quote, ScanFilter, ScanOutcome, ScanReport};
use arb_sizer::{PriceQuote, SizerError};
use arb_sizer::sizing::{is_opportunity, pair_margin, PositionSizer, DEFAULT_MIN_PROFIT_MARGIN};

/// Market-neutral position sizing for Yes/No arbitrage.
#[derive(Parser, Debug)]
#[command(name = "arb-sizer")]
#[command(about = "Size market-neutral Yes/No arbitrage trades under risk limits")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size a single Yes/No quote.
    Size {
        /// Yes ask price in dollars.
        #[arg(long = "yes")]
        yes_price: Decimal,

        /// No ask price in dollars.
        #[arg(long = "no")]
        no_price: Decimal,

        /// Available balance in dollars.
        #[arg(long)]
        balance: Decimal,

        /// Print the position as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run the opportunity pre-filter on a quote.
    Check {
        /// Yes ask price in dollars.
        #[arg(long = "yes")]
        yes_price: Decimal,

        /// No ask price in dollars.
        #[arg(long = "no")]
        no_price: Decimal,

        /// Minimum profit margin (defaults to 0.001).
        #[arg(long)]
        min_margin: Option<Decimal>,
    },

    /// Size every quote in a JSON file against one balance.
    Scan {
        /// JSON array of quotes.
        #[arg(short, long)]
        input: PathBuf,

        /// Available balance in dollars.
        #[arg(long)]
        balance: Decimal,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Print Prometheus metrics after the report.
        #[arg(long)]
        metrics: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load();
    let app = config
        .as_ref()
        .map(|c| c.app.clone())
        .unwrap_or_default();
    init_logging(&app, args.verbose);

    match args.command {
        Command::CheckConfig => cmd_check_config(config),
        Command::Size {
            yes_price,
            no_price,
            balance,
            json,
        } => cmd_size(load_valid(config)?, yes_price, no_price, balance, json),
        Command::Check {
            yes_price,
            no_price,
            min_margin,
        } => cmd_check(yes_price, no_price, min_margin),
        Command::Scan {
            input,
            balance,
            json,
            metrics,
        } => cmd_scan(load_valid(config)?, input, balance, json, metrics),
    }
}

fn init_logging(app: &AppConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("arb_sizer=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app.log_level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if app.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_valid(config: arb_sizer::Result<Config>) -> anyhow::Result<Config> {
    config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::Error::new(e)
    })
}

/// Check configuration validity.
fn cmd_check_config(config: arb_sizer::Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ARB SIZER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            println!("Validating configuration... OK");
            c
        }
        Err(SizerError::InvalidConfig(e)) => {
            println!("OK");
            println!("Validating configuration... FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    let trading = &config.trading;
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.app.environment);
    println!("  Max Position: ${}", trading.max_position_size_usd);
    println!(
        "  Max Balance Fraction: {} ({}%)",
        trading.max_balance_percent,
        trading.max_balance_percent * Decimal::ONE_HUNDRED
    );
    println!("  Min Profit Margin: {}", trading.min_profit_margin);
    println!("  Min Spread: {}c", trading.min_spread_cents);
    println!("  Crypto Min Spread: {}c", trading.crypto_market_min_spread_cents);
    println!("  Log Level: {}", config.app.log_level);
    println!("  JSON Logs: {}", if config.app.log_json { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Size a single quote.
fn cmd_size(
    config: Config,
    yes_price: Decimal,
    no_price: Decimal,
    balance: Decimal,
    json: bool,
) -> anyhow::Result<()> {
    let quote = PriceQuote::new(yes_price, no_price);
    let position = size_quote(&config.trading, &quote, balance)?;

    info!(%position, viable = position.is_viable(), "Sized quote");

    if json {
        println!("{}", serde_json::to_string_pretty(&position)?);
        return Ok(());
    }

    println!("----------------------------------------------------------------------");
    println!("  Contracts (each side): {}", position.contracts);
    println!("  Yes: {} x ${} = ${}", position.contracts, position.yes_price, position.yes_cost);
    println!("  No:  {} x ${} = ${}", position.contracts, position.no_price, position.no_cost);
    println!("  Total Cost: ${}", position.total_cost);
    println!("  Expected Payout: ${}", position.expected_payout);
    println!("  Expected Profit: ${}", position.expected_profit);
    println!(
        "  Profit Margin: {:.2}%",
        (position.profit_margin * Decimal::ONE_HUNDRED).round_dp(2)
    );
    println!("  Limited By: {}", position.constraint_triggered);
    println!("  Viable: {}", if position.is_viable() { "YES" } else { "NO" });
    println!("----------------------------------------------------------------------");

    Ok(())
}

/// Run the opportunity pre-filter.
fn cmd_check(
    yes_price: Decimal,
    no_price: Decimal,
    min_margin: Option<Decimal>,
) -> anyhow::Result<()> {
    let min_margin = min_margin.unwrap_or(DEFAULT_MIN_PROFIT_MARGIN);
    let (profit, margin) = pair_margin(yes_price, no_price);
    let passed = is_opportunity(yes_price, no_price, min_margin);

    println!(
        "Yes=${} + No=${} = ${} | profit=${} | margin={:.4} (min {}) | {}",
        yes_price,
        no_price,
        yes_price + no_price,
        profit,
        margin,
        min_margin,
        if passed { "OPPORTUNITY" } else { "NO OPPORTUNITY" }
    );

    Ok(())
}

/// Size every quote in a file.
fn cmd_scan(
    config: Config,
    input: PathBuf,
    balance: Decimal,
    json: bool,
    with_metrics: bool,
) -> anyhow::Result<()> {
    let handle = if with_metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install metrics recorder")?,
        )
    } else {
        None
    };
    metrics::init_metrics();

    let quotes = load_quotes(&input)
        .with_context(|| format!("failed to load quotes from {}", input.display()))?;

    let sizer = PositionSizer::from_config(&config.trading)?;
    let filter = ScanFilter::from_config(&config.trading);
    let report = scan(&sizer, &quotes, balance, &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(handle) = handle {
        println!("{}", handle.render());
    }

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("======================================================================");
    println!("SCAN REPORT - balance ${}", report.available_balance);
    println!("======================================================================");

    for entry in &report.entries {
        let market = entry.market.as_deref().unwrap_or("-");
        match &entry.outcome {
            ScanOutcome::Sized { position } => {
                println!("[{}] {} | {}", entry.index, market, position)
            }
            ScanOutcome::Filtered { reason } => {
                println!("[{}] {} | filtered: {}", entry.index, market, reason)
            }
            ScanOutcome::Rejected { reason } => {
                println!("[{}] {} | rejected: {}", entry.index, market, reason)
            }
        }
    }

    println!("----------------------------------------------------------------------");
    println!(
        "Sized: {}  Viable: {}  Filtered: {}  Rejected: {}",
        report.sized, report.viable, report.filtered, report.rejected
    );
    if let Some(best) = report.best() {
        if let Some(position) = best.outcome.position() {
            println!(
                "Best: [{}] {} -> {} contracts, profit ${}",
                best.index,
                best.market.as_deref().unwrap_or("-"),
                position.contracts,
                position.expected_profit
            );
        }
    }
    println!("======================================================================");
}
