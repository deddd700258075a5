//! Stocks, their trade history and per-stock metrics.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::GbceError;
use super::trade::{Side, Trade};

/// Trailing window used for the volume weighted stock price.
pub const VWSP_WINDOW_MINUTES: i64 = 5;

pub fn default_window() -> Duration {
    Duration::minutes(VWSP_WINDOW_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockClass {
    Common,
    Preferred,
}

impl FromStr for StockClass {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(StockClass::Common),
            "preferred" => Ok(StockClass::Preferred),
            _ => Err(GbceError::UnknownStockClass {
                value: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for StockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            StockClass::Common => "Common",
            StockClass::Preferred => "Preferred",
        })
    }
}

/// A listed stock and the trades recorded against it.
///
/// The trade history is append-only and kept in recording order, which is not
/// necessarily timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    symbol: String,
    class: StockClass,
    last_dividend: f64,
    fixed_dividend: f64,
    par_value: f64,
    trades: Vec<Trade>,
}

impl Stock {
    pub fn new(
        symbol: &str,
        class: StockClass,
        last_dividend: f64,
        fixed_dividend: f64,
        par_value: f64,
    ) -> Result<Self, GbceError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(GbceError::malformed("symbol", "symbol must not be empty"));
        }
        if !last_dividend.is_finite() || last_dividend < 0.0 {
            return Err(GbceError::out_of_range(
                "last_dividend",
                format!("must be non-negative, got {last_dividend}"),
            ));
        }
        if !fixed_dividend.is_finite() || fixed_dividend < 0.0 {
            return Err(GbceError::out_of_range(
                "fixed_dividend",
                format!("must be non-negative, got {fixed_dividend}"),
            ));
        }
        if !par_value.is_finite() || par_value <= 0.0 {
            return Err(GbceError::out_of_range(
                "par_value",
                format!("must be positive, got {par_value}"),
            ));
        }
        Ok(Stock {
            symbol,
            class,
            last_dividend,
            fixed_dividend,
            par_value,
            trades: Vec::new(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn class(&self) -> StockClass {
        self.class
    }

    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn fixed_dividend(&self) -> f64 {
        self.fixed_dividend
    }

    pub fn par_value(&self) -> f64 {
        self.par_value
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Dividend amount per share: the last dividend for common stock,
    /// fixed rate * par value for preferred stock.
    pub fn dividend(&self) -> f64 {
        match self.class {
            StockClass::Common => self.last_dividend,
            StockClass::Preferred => self.fixed_dividend * self.par_value,
        }
    }

    /// Record a trade stamped with the current wall-clock time.
    pub fn record_trade(&mut self, quantity: i64, side: Side, price: f64) -> Result<(), GbceError> {
        self.record_trade_at(Utc::now(), quantity, side, price)
    }

    pub fn record_trade_at(
        &mut self,
        timestamp: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: f64,
    ) -> Result<(), GbceError> {
        let trade = Trade::new(timestamp, quantity, side, price)?;
        self.trades.push(trade);
        Ok(())
    }

    /// Append an already validated trade, e.g. one loaded from history.
    pub fn push_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn calculate_dividend_yield(&self, price: f64) -> Result<f64, GbceError> {
        let price = check_price(price)?;
        Ok(self.dividend() / price)
    }

    /// price / dividend, or exactly 0 when the stock pays no dividend.
    pub fn calculate_pe_ratio(&self, price: f64) -> Result<f64, GbceError> {
        let price = check_price(price)?;
        let dividend = self.dividend();
        if dividend == 0.0 {
            return Ok(0.0);
        }
        Ok(price / dividend)
    }

    /// Volume weighted price of the trades made in the last five minutes.
    pub fn calculate_volume_weighted_stock_price(&self) -> f64 {
        self.calculate_volume_weighted_stock_price_at(Utc::now())
    }

    pub fn calculate_volume_weighted_stock_price_at(&self, now: DateTime<Utc>) -> f64 {
        self.volume_weighted_price_over(now, default_window())
    }

    /// Sum(price * quantity) / Sum(quantity) over trades with
    /// `now - window <= timestamp <= now`. Returns 0 when no trade qualifies.
    pub fn volume_weighted_price_over(&self, now: DateTime<Utc>, window: Duration) -> f64 {
        let since = now - window;
        let (notional, quantity) = self
            .trades
            .iter()
            .filter(|t| t.timestamp() >= since && t.timestamp() <= now)
            .fold((0.0_f64, 0.0_f64), |(notional, quantity), t| {
                (notional + t.notional(), quantity + t.quantity() as f64)
            });

        if quantity <= 0.0 {
            return 0.0;
        }
        notional / quantity
    }
}

fn check_price(price: f64) -> Result<f64, GbceError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(GbceError::NonPositivePrice { price });
    }
    Ok(price)
}
