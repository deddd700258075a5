//! The all share index over a set of stocks.

use chrono::{DateTime, Duration, Utc};

use super::stock::{Stock, default_window};

/// Geometric mean of the strictly positive prices.
///
/// Zero or negative prices (stocks with no recent trades) are left out of both
/// the product and the count. Returns 0 when no price remains. The mean is
/// taken over logarithms so large indices neither overflow nor underflow.
pub fn all_share_index<I>(prices: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (log_sum, count) = prices
        .into_iter()
        .filter(|&p| p > 0.0)
        .fold((0.0_f64, 0usize), |(log_sum, count), p| (log_sum + p.ln(), count + 1));

    if count == 0 {
        return 0.0;
    }
    (log_sum / count as f64).exp()
}

/// Ordered collection of stocks. Insertion order is kept and duplicates are
/// allowed.
///
/// The index value is recomputed on every call so that trades recorded after a
/// previous calculation are always reflected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    stocks: Vec<Stock>,
}

impl Index {
    pub fn new() -> Self {
        Index { stocks: Vec::new() }
    }

    pub fn add_stock(&mut self, stock: Stock) {
        self.stocks.push(stock);
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.stocks.iter().map(|s| s.symbol()).collect()
    }

    /// First stock registered under `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&Stock> {
        let symbol = symbol.trim().to_uppercase();
        self.stocks.iter().find(|s| s.symbol() == symbol)
    }

    pub fn stock_mut(&mut self, symbol: &str) -> Option<&mut Stock> {
        let symbol = symbol.trim().to_uppercase();
        self.stocks.iter_mut().find(|s| s.symbol() == symbol)
    }

    pub fn stock_at_mut(&mut self, position: usize) -> Option<&mut Stock> {
        self.stocks.get_mut(position)
    }

    pub fn calculate_all_share_index(&self) -> f64 {
        self.calculate_all_share_index_at(Utc::now())
    }

    pub fn calculate_all_share_index_at(&self, now: DateTime<Utc>) -> f64 {
        self.all_share_index_over(now, default_window())
    }

    pub fn all_share_index_over(&self, now: DateTime<Utc>, window: Duration) -> f64 {
        all_share_index(
            self.stocks
                .iter()
                .map(|s| s.volume_weighted_price_over(now, window)),
        )
    }
}
