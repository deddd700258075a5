//! Building an index from a market file and loading trade history into it.

use chrono::Duration;
use std::collections::HashSet;

use crate::domain::config_validation::validate_market_config;
use crate::domain::error::GbceError;
use crate::domain::index::Index;
use crate::domain::stock::{Stock, StockClass, VWSP_WINDOW_MINUTES};
use crate::ports::config_port::ConfigPort;
use crate::ports::trade_port::TradePort;

/// Parse a comma separated symbol list. Symbols are upper-cased; empty tokens
/// and duplicates are rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, GbceError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(GbceError::ConfigInvalid {
                section: "index".to_string(),
                key: "symbols".to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(GbceError::ConfigInvalid {
                section: "index".to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol: {symbol}"),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Trailing window for volume weighted prices, `[index] vwsp_window_minutes`.
pub fn window(config: &dyn ConfigPort) -> Duration {
    Duration::minutes(config.get_int("index", "vwsp_window_minutes", VWSP_WINDOW_MINUTES))
}

/// `[index] require_history`: treat a listed symbol without trade history as
/// an error instead of a warning.
pub fn require_history(config: &dyn ConfigPort) -> bool {
    config.get_bool("index", "require_history", false)
}

/// Sections of the market file that are neither `[index]` nor a listed symbol.
pub fn unlisted_sections(config: &dyn ConfigPort) -> Result<Vec<String>, GbceError> {
    let symbols = parse_symbols(&config.get_string("index", "symbols").unwrap_or_default())?;
    let listed: HashSet<String> = symbols.iter().map(|s| s.to_lowercase()).collect();
    Ok(config
        .sections()
        .into_iter()
        .filter(|section| section != "index" && !listed.contains(section))
        .collect())
}

/// Validate the market file and build an index with one stock per listed
/// symbol, in listing order.
pub fn build_index(config: &dyn ConfigPort) -> Result<Index, GbceError> {
    validate_market_config(config)?;

    let symbols = parse_symbols(&config.get_string("index", "symbols").unwrap_or_default())?;
    let mut index = Index::new();
    for symbol in &symbols {
        index.add_stock(build_stock(config, symbol)?);
    }
    Ok(index)
}

fn build_stock(config: &dyn ConfigPort, symbol: &str) -> Result<Stock, GbceError> {
    let class: StockClass = config
        .get_string(symbol, "class")
        .unwrap_or_default()
        .parse()?;
    Stock::new(
        symbol,
        class,
        config.get_double(symbol, "last_dividend", 0.0),
        config.get_double(symbol, "fixed_dividend", 0.0),
        config.get_double(symbol, "par_value", 0.0),
    )
}

/// Append the recorded history of every stock in `index`.
///
/// Symbols the port has no data for are skipped and returned alongside the
/// number of trades loaded.
pub fn load_trades(
    index: &mut Index,
    trades: &dyn TradePort,
) -> Result<LoadSummary, GbceError> {
    let mut summary = LoadSummary::default();

    for position in 0..index.len() {
        let Some(stock) = index.stock_at_mut(position) else {
            continue;
        };
        match trades.fetch_trades(stock.symbol()) {
            Ok(history) => {
                summary.loaded += history.len();
                for trade in history {
                    stock.push_trade(trade);
                }
            }
            Err(GbceError::NoData { symbol }) => summary.missing.push(symbol),
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub missing: Vec<String>,
}

/// The sample GBCE market: TEA, POP, ALE, GIN and JOE, without trades.
pub fn sample_index() -> Result<Index, GbceError> {
    let mut index = Index::new();
    index.add_stock(Stock::new("TEA", StockClass::Common, 0.0, 0.0, 100.0)?);
    index.add_stock(Stock::new("POP", StockClass::Common, 8.0, 0.0, 100.0)?);
    index.add_stock(Stock::new("ALE", StockClass::Common, 23.0, 0.0, 60.0)?);
    index.add_stock(Stock::new("GIN", StockClass::Preferred, 8.0, 0.02, 100.0)?);
    index.add_stock(Stock::new("JOE", StockClass::Common, 13.0, 0.0, 250.0)?);
    Ok(index)
}
