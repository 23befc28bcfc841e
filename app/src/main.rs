// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use chrono::Local;
use clap::{Parser, Subcommand};
use core_types::{Evaluation, Signal, Symbol, Ticker};
use report::{Report, ReportDefinition, write_atomically};
use strategies::{GoldenCross, SignalEvaluator};
use tracing_subscriber::prelude::*;

mod runner;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Reports golden crosses of the 5-day and 20-day moving averages for a watchlist.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates the whole watchlist and replaces the report file (the default).
    Run {
        /// Print the report to stdout instead of replacing the file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Evaluates a single symbol and prints its moving averages.
    Evaluate {
        /// The provider symbol (e.g., "AAPL", "005930.KS").
        symbol: String,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load settings")?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting golden-cross report");

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => {
            run_report(&settings, dry_run).await?;
        }
        Commands::Evaluate { symbol } => {
            handle_evaluate(&settings, symbol).await?;
        }
    }

    tracing::info!("golden-cross has finished successfully.");

    Ok(())
}

fn init_tracing(log_level: &str) {
    let parsed = parse_log_level(log_level);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper_util", tracing::Level::WARN) // Connection pool chatter
            .with_default(parsed.unwrap_or(tracing::Level::INFO)));
    tracing_subscriber::registry().with(fmt_layer).init();

    if parsed.is_none() {
        tracing::warn!(log_level, "Unrecognized app.log_level, logging at INFO instead.");
    }
}

/// Accepts the usual level names in any case ("warn", "DEBUG", ...).
fn parse_log_level(raw: &str) -> Option<tracing::Level> {
    raw.trim().parse().ok()
}

// --- "Run" Subcommand Logic ---

/// Evaluates every watchlist ticker and publishes the Markdown report.
///
/// Per-ticker failures end up in the report; only a failure to write the
/// file makes the run fail.
async fn run_report(settings: &Settings, dry_run: bool) -> Result<()> {
    // --- 1. Initialization ---
    let watchlist = app_config::load_watchlist().context("Failed to load watchlist")?;
    tracing::info!(tickers = watchlist.tickers.len(), "Watchlist loaded.");

    let evaluator = GoldenCross::new(settings.strategy.clone())?;
    let client = api_client::new(&settings.provider)?;

    // --- 2. Evaluate, strictly in watchlist order ---
    let outcomes = runner::collect_outcomes(&client, &evaluator, &watchlist.tickers).await;

    // --- 3. Render ---
    let definition = ReportDefinition {
        settings: settings.report.clone(),
        markets: watchlist.markets.clone(),
        short_period: settings.strategy.short_period,
        long_period: settings.strategy.long_period,
    };
    let report = Report::compile(
        &definition,
        Local::now().naive_local(),
        watchlist.tickers.iter().zip(outcomes),
    );
    let document = report.to_markdown();

    if dry_run {
        print!("{document}");
        return Ok(());
    }

    // --- 4. Publish ---
    let path = &settings.report.output_path;
    write_atomically(path, &document)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = report.rows.len(), "Report updated.");

    Ok(())
}

// --- "Evaluate" Subcommand Logic ---

async fn handle_evaluate(settings: &Settings, symbol: String) -> Result<()> {
    let evaluator = GoldenCross::new(settings.strategy.clone())?;
    let client = api_client::new(&settings.provider)?;
    let ticker = Ticker {
        name: symbol.clone(),
        symbol: Symbol(symbol),
        market: String::new(),
    };

    let evaluation = runner::evaluate_ticker(&client, &evaluator, &ticker).await?;
    print_evaluation(&ticker, &evaluator, &evaluation);
    Ok(())
}

/// Helper function to print a single evaluation.
fn print_evaluation(ticker: &Ticker, evaluator: &GoldenCross, evaluation: &Evaluation) {
    let periods = evaluator.settings();
    println!("\n--- {} ({}) ---", ticker.symbol, evaluator.name());
    match evaluation {
        Evaluation::Ready(result) => {
            println!("  - Last close: {:.2}", result.last_close);
            println!("  - MA{}: {:.2}", periods.short_period, result.ma_short);
            println!("  - MA{}: {:.2}", periods.long_period, result.ma_long);
            let signal = match result.signal {
                Signal::GoldenCross => "GOLDEN CROSS",
                Signal::Waiting => "waiting",
            };
            println!("  - Signal: {signal}");
        }
        Evaluation::InsufficientData { bars } => {
            println!(
                "  - Insufficient data: {} bars, at least {} needed",
                bars, periods.min_bars
            );
        }
    }
}
