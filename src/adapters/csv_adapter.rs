//! CSV trade history adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with the header
//! `timestamp,quantity,side,price` and RFC 3339 timestamps.

use crate::domain::error::GbceError;
use crate::domain::trade::Trade;
use crate::ports::trade_port::TradePort;
use std::fs;
use std::path::PathBuf;

const COLUMNS: [&str; 4] = ["timestamp", "quantity", "side", "price"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl TradePort for CsvAdapter {
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<Trade>, GbceError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(GbceError::NoData {
                symbol: symbol.to_uppercase(),
            });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| GbceError::TradeData {
                reason: format!("{}: row {}: {}", path.display(), row + 1, e),
            })?;

            let column = |idx: usize| {
                record.get(idx).ok_or_else(|| GbceError::TradeData {
                    reason: format!(
                        "{}: row {}: missing {} column",
                        path.display(),
                        row + 1,
                        COLUMNS[idx]
                    ),
                })
            };

            let trade = Trade::parse(column(0)?, column(1)?, column(2)?, column(3)?).map_err(|e| {
                GbceError::TradeData {
                    reason: format!("{}: row {}: {}", path.display(), row + 1, e),
                }
            })?;

            trades.push(trade);
        }

        trades.sort_by_key(|t| t.timestamp());
        Ok(trades)
    }

    fn list_symbols(&self) -> Result<Vec<String>, GbceError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| GbceError::TradeData {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| GbceError::TradeData {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
