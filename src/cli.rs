//! CLI definition and dispatch.

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_market_config;
use crate::domain::error::GbceError;
use crate::domain::index::Index;
use crate::domain::market::{self, LoadSummary, parse_symbols};
use crate::domain::stock::default_window;
use crate::domain::summary::StockSummary;
use crate::domain::trade::Side;
use crate::ports::config_port::ConfigPort;
use crate::ports::trade_port::TradePort;

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Stock metrics and all share index calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report per-stock metrics and the all share index
    Report {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <SYMBOL>.csv trade files
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// Price for dividend yield and P/E (defaults to each stock's VWSP)
        #[arg(long)]
        price: Option<f64>,
        /// Evaluate as of this RFC 3339 time instead of now
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Validate a market configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols with trade history
    ListSymbols {
        #[arg(short, long)]
        trades: PathBuf,
    },
    /// Trade the sample market and print its metrics
    Demo {
        #[arg(long, default_value_t = 100.0)]
        price: f64,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            trades,
            price,
            as_of,
        } => run_report(&config, trades.as_ref(), price, as_of.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { trades } => run_list_symbols(&trades),
        Command::Demo { price } => run_demo(price),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GbceError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn parse_as_of(value: Option<&str>) -> Result<DateTime<Utc>, GbceError> {
    match value {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| GbceError::Malformed {
                field: "as-of".into(),
                reason: format!("'{s}': {e}"),
            }),
    }
}

fn run_report(
    config_path: &PathBuf,
    trades_path: Option<&PathBuf>,
    price: Option<f64>,
    as_of: Option<&str>,
) -> ExitCode {
    // Stage 1: Load config and build the index
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut index = match market::build_index(&adapter) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let window = market::window(&adapter);

    // Stage 2: Load trade history
    if let Some(dir) = trades_path {
        eprintln!("Loading trades from {}", dir.display());
        let trades = CsvAdapter::new(dir.clone());
        let summary = match load_history(&mut index, &trades) {
            Ok(s) => s,
            Err(code) => return code,
        };
        let required = market::require_history(&adapter);
        if let Some(symbol) = summary.missing.first().filter(|_| required) {
            let err = GbceError::NoData {
                symbol: symbol.clone(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    }

    // Stage 3: Resolve evaluation time and price
    let now = match parse_as_of(as_of) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(p) = price.filter(|p| !p.is_finite() || *p <= 0.0) {
        let err = GbceError::NonPositivePrice { price: p };
        eprintln!("error: {err}");
        return (&err).into();
    }

    // Stage 4: Print metrics
    print_report(&index, price, now, window);
    ExitCode::SUCCESS
}

pub fn load_history(index: &mut Index, trades: &dyn TradePort) -> Result<LoadSummary, ExitCode> {
    match market::load_trades(index, trades) {
        Ok(summary) => {
            for symbol in &summary.missing {
                eprintln!("warning: no trade history for {symbol}");
            }
            eprintln!("  Loaded {} trades", summary.loaded);
            Ok(summary)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err((&e).into())
        }
    }
}

pub fn print_report(index: &Index, price: Option<f64>, now: DateTime<Utc>, window: Duration) {
    eprintln!(
        "\n=== Stocks as of {} ({} minute window) ===",
        now.to_rfc3339(),
        window.num_minutes()
    );
    for stock in index.stocks() {
        let summary = StockSummary::compute(stock, price, now, window);
        println!("{}", format_summary(&summary));
    }
    println!(
        "All Share Index: {:.4}",
        index.all_share_index_over(now, window)
    );
}

pub fn format_summary(summary: &StockSummary) -> String {
    let ratio = |v: Option<f64>, precision: usize| match v {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    };
    format!(
        "{:<6} {:<9} trades={:<4} vwsp={:<10.4} yield={:<8} pe={}",
        summary.symbol,
        summary.class,
        summary.trade_count,
        summary.volume_weighted_price,
        ratio(summary.dividend_yield, 4),
        ratio(summary.pe_ratio, 2),
    )
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating market: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_market_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let symbols = adapter
        .get_string("index", "symbols")
        .map(|s| parse_symbols(&s).unwrap_or_default())
        .unwrap_or_default();
    eprintln!("\nSymbols:");
    for symbol in &symbols {
        let class = adapter.get_string(symbol, "class").unwrap_or_default();
        eprintln!("  {symbol}: {class}");
    }
    eprintln!("Window: {} minutes", market::window(&adapter).num_minutes());
    for section in market::unlisted_sections(&adapter).unwrap_or_default() {
        eprintln!("warning: section [{section}] is not listed in [index] symbols");
    }

    eprintln!("\nMarket configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(trades_path: &PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(trades_path.clone());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No trade files found in {}", trades_path.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

/// Trades recorded against the sample market by the demo.
pub const SAMPLE_TRADES: [(&str, i64, Side, f64); 6] = [
    ("TEA", 100, Side::Buy, 110.0),
    ("TEA", 50, Side::Sell, 115.0),
    ("POP", 200, Side::Buy, 120.0),
    ("GIN", 150, Side::Sell, 130.0),
    ("ALE", 80, Side::Buy, 95.0),
    ("JOE", 120, Side::Sell, 140.0),
];

pub fn record_sample_trades(index: &mut Index, at: DateTime<Utc>) -> Result<(), GbceError> {
    for (symbol, quantity, side, price) in SAMPLE_TRADES {
        let stock = index.stock_mut(symbol).ok_or_else(|| GbceError::NoData {
            symbol: symbol.to_string(),
        })?;
        stock.record_trade_at(at, quantity, side, price)?;
    }
    Ok(())
}

fn run_demo(price: f64) -> ExitCode {
    let mut index = match market::sample_index() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let now = Utc::now();
    if let Err(e) = record_sample_trades(&mut index, now) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Recorded {} sample trades", SAMPLE_TRADES.len());

    if !price.is_finite() || price <= 0.0 {
        let err = GbceError::NonPositivePrice { price };
        eprintln!("error: {err}");
        return (&err).into();
    }

    print_report(&index, Some(price), now, default_window());
    ExitCode::SUCCESS
}
