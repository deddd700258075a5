//! Domain error types.

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum GbceError {
    #[error("malformed {field}: {reason}")]
    Malformed { field: String, reason: String },

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("unknown stock class '{value}' (expected Common or Preferred)")]
    UnknownStockClass { value: String },

    #[error("price must be positive and finite, got {price}")]
    NonPositivePrice { price: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade data error: {reason}")]
    TradeData { reason: String },

    #[error("no trade data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GbceError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        GbceError::Malformed {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &str, reason: impl Into<String>) -> Self {
        GbceError::OutOfRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for trade/stock field validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GbceError::Malformed { .. }
                | GbceError::OutOfRange { .. }
                | GbceError::UnknownStockClass { .. }
                | GbceError::NonPositivePrice { .. }
        )
    }
}

impl From<&GbceError> for std::process::ExitCode {
    fn from(err: &GbceError) -> Self {
        let code: u8 = match err {
            GbceError::Io(_) => 1,
            GbceError::ConfigParse { .. }
            | GbceError::ConfigMissing { .. }
            | GbceError::ConfigInvalid { .. } => 2,
            GbceError::TradeData { .. } => 3,
            e if e.is_validation() => 4,
            GbceError::NoData { .. } => 5,
            _ => 1,
        };
        std::process::ExitCode::from(code)
    }
}
