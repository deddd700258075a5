//! Trade records.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::GbceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(GbceError::malformed(
                "side",
                format!("'{other}' is not one of buy, sell"),
            )),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        })
    }
}

/// A single executed trade. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    timestamp: DateTime<Utc>,
    quantity: i64,
    side: Side,
    price: f64,
}

impl Trade {
    pub fn new(
        timestamp: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: f64,
    ) -> Result<Self, GbceError> {
        if quantity <= 0 {
            return Err(GbceError::out_of_range(
                "quantity",
                format!("must be a positive integer, got {quantity}"),
            ));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(GbceError::out_of_range(
                "price",
                format!("must be a positive number, got {price}"),
            ));
        }
        Ok(Trade {
            timestamp,
            quantity,
            side,
            price,
        })
    }

    /// Build a trade from textual fields, e.g. a CSV row.
    ///
    /// Shape errors (unparseable text) are reported as `Malformed`; values
    /// that parse but violate an invariant are reported as `OutOfRange`.
    pub fn parse(timestamp: &str, quantity: &str, side: &str, price: &str) -> Result<Self, GbceError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
            .map_err(|e| GbceError::malformed("timestamp", format!("'{timestamp}': {e}")))?
            .with_timezone(&Utc);
        let quantity: i64 = quantity
            .trim()
            .parse()
            .map_err(|e| GbceError::malformed("quantity", format!("'{quantity}': {e}")))?;
        let side: Side = side.parse()?;
        let price: f64 = price
            .trim()
            .parse()
            .map_err(|e| GbceError::malformed("price", format!("'{price}': {e}")))?;
        Trade::new(timestamp, quantity, side, price)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// price * quantity
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 9, 10, 30, 0).unwrap()
    }

    #[test]
    fn new_keeps_fields() {
        let trade = Trade::new(ts(), 100, Side::Buy, 150.0).unwrap();
        assert_eq!(trade.timestamp(), ts());
        assert_eq!(trade.quantity(), 100);
        assert_eq!(trade.side(), Side::Buy);
        assert!((trade.price() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_quantity_rejected() {
        let err = Trade::new(ts(), -10, Side::Buy, 150.0).unwrap_err();
        assert!(matches!(err, GbceError::OutOfRange { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(Trade::new(ts(), 0, Side::Sell, 150.0).is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let err = Trade::new(ts(), 100, Side::Buy, -50.0).unwrap_err();
        assert!(matches!(err, GbceError::OutOfRange { ref field, .. } if field == "price"));
    }

    #[test]
    fn non_finite_price_rejected() {
        assert!(Trade::new(ts(), 100, Side::Buy, f64::NAN).is_err());
        assert!(Trade::new(ts(), 100, Side::Buy, f64::INFINITY).is_err());
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!(" Buy ".parse::<Side>().unwrap(), Side::Buy);
    }

    #[test]
    fn unknown_side_rejected() {
        let err = "hold".parse::<Side>().unwrap_err();
        assert!(matches!(err, GbceError::Malformed { ref field, .. } if field == "side"));
    }

    #[test]
    fn side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn parse_valid_row() {
        let trade = Trade::parse("2024-07-09T10:30:00Z", "100", "sell", "110.5").unwrap();
        assert_eq!(trade.timestamp(), ts());
        assert_eq!(trade.quantity(), 100);
        assert_eq!(trade.side(), Side::Sell);
        assert!((trade.price() - 110.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_malformed_timestamp() {
        let err = Trade::parse("2024-07-09", "100", "buy", "150").unwrap_err();
        assert!(matches!(err, GbceError::Malformed { ref field, .. } if field == "timestamp"));
    }

    #[test]
    fn parse_malformed_quantity() {
        let err = Trade::parse("2024-07-09T10:30:00Z", "1.5", "buy", "150").unwrap_err();
        assert!(matches!(err, GbceError::Malformed { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn parse_malformed_price() {
        let err = Trade::parse("2024-07-09T10:30:00Z", "10", "buy", "abc").unwrap_err();
        assert!(matches!(err, GbceError::Malformed { ref field, .. } if field == "price"));
    }

    #[test]
    fn parse_out_of_range_quantity() {
        let err = Trade::parse("2024-07-09T10:30:00Z", "-5", "buy", "150").unwrap_err();
        assert!(matches!(err, GbceError::OutOfRange { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn parse_offset_timestamp_normalised_to_utc() {
        let trade = Trade::parse("2024-07-09T12:30:00+02:00", "1", "buy", "1").unwrap();
        assert_eq!(trade.timestamp(), ts());
    }

    #[test]
    fn notional() {
        let trade = Trade::new(ts(), 200, Side::Sell, 120.0).unwrap();
        assert!((trade.notional() - 24_000.0).abs() < f64::EPSILON);
    }
}
