#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gbce::domain::error::GbceError;
use gbce::domain::stock::{Stock, StockClass};
pub use gbce::domain::trade::{Side, Trade};
use gbce::ports::trade_port::TradePort;
use std::collections::HashMap;

pub struct MockTradePort {
    pub data: HashMap<String, Vec<Trade>>,
    pub errors: HashMap<String, String>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_trades(mut self, symbol: &str, trades: Vec<Trade>) -> Self {
        self.data.insert(symbol.to_string(), trades);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl TradePort for MockTradePort {
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<Trade>, GbceError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GbceError::TradeData {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| GbceError::NoData {
                symbol: symbol.to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, GbceError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Fixed evaluation time used across the tests.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 9, 12, 0, 0).unwrap()
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    anchor() - Duration::minutes(minutes)
}

pub fn make_trade(minutes: i64, quantity: i64, side: Side, price: f64) -> Trade {
    Trade::new(minutes_ago(minutes), quantity, side, price).unwrap()
}

pub fn common(symbol: &str, last_dividend: f64) -> Stock {
    Stock::new(symbol, StockClass::Common, last_dividend, 0.0, 100.0).unwrap()
}

pub fn preferred(symbol: &str, fixed_dividend: f64, par_value: f64) -> Stock {
    Stock::new(symbol, StockClass::Preferred, 8.0, fixed_dividend, par_value).unwrap()
}

pub const MARKET_INI: &str = r#"
[index]
symbols = TEA, POP, ALE, GIN, JOE
vwsp_window_minutes = 5

[TEA]
class = Common
last_dividend = 0
fixed_dividend = 0
par_value = 100

[POP]
class = Common
last_dividend = 8
par_value = 100

[ALE]
class = Common
last_dividend = 23
par_value = 60

[GIN]
class = Preferred
last_dividend = 8
fixed_dividend = 0.02
par_value = 100

[JOE]
class = Common
last_dividend = 13
par_value = 250
"#;
