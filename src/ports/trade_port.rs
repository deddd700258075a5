//! Trade history port trait.

use crate::domain::error::GbceError;
use crate::domain::trade::Trade;

pub trait TradePort {
    /// All recorded trades for `symbol`, oldest first. A symbol without any
    /// history yields `GbceError::NoData`.
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<Trade>, GbceError>;

    fn list_symbols(&self) -> Result<Vec<String>, GbceError>;
}
