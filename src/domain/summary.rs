//! Per-stock metric snapshot for reports.

use chrono::{DateTime, Duration, Utc};

use super::stock::{Stock, StockClass};

#[derive(Debug, Clone, PartialEq)]
pub struct StockSummary {
    pub symbol: String,
    pub class: StockClass,
    pub trade_count: usize,
    pub volume_weighted_price: f64,
    /// Price the ratios were computed against, if any was usable.
    pub reference_price: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
}

impl StockSummary {
    /// Summarise `stock` at `now`. Ratios use `price` when given, otherwise the
    /// stock's volume weighted price when it has recent trades.
    pub fn compute(stock: &Stock, price: Option<f64>, now: DateTime<Utc>, window: Duration) -> Self {
        let volume_weighted_price = stock.volume_weighted_price_over(now, window);
        let reference_price = price
            .or((volume_weighted_price > 0.0).then_some(volume_weighted_price))
            .filter(|p| p.is_finite() && *p > 0.0);

        let dividend_yield = reference_price.and_then(|p| stock.calculate_dividend_yield(p).ok());
        let pe_ratio = reference_price.and_then(|p| stock.calculate_pe_ratio(p).ok());

        StockSummary {
            symbol: stock.symbol().to_string(),
            class: stock.class(),
            trade_count: stock.trade_count(),
            volume_weighted_price,
            reference_price,
            dividend_yield,
            pe_ratio,
        }
    }
}
