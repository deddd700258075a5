//! Market configuration validation.
//!
//! Validates the `[index]` section and every listed stock section before an
//! index is built from the file.

use crate::domain::error::GbceError;
use crate::domain::market::parse_symbols;
use crate::domain::stock::StockClass;
use crate::ports::config_port::ConfigPort;

/// Longest accepted volume weighted price window: one week.
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

pub fn validate_market_config(config: &dyn ConfigPort) -> Result<(), GbceError> {
    let symbols = validate_symbols(config)?;
    validate_window(config)?;
    for symbol in &symbols {
        validate_stock_section(config, symbol)?;
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, GbceError> {
    match config.get_string("index", "symbols") {
        Some(s) if !s.trim().is_empty() => parse_symbols(&s),
        _ => Err(GbceError::ConfigMissing {
            section: "index".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), GbceError> {
    let Some(raw) = config.get_string("index", "vwsp_window_minutes") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_WINDOW_MINUTES).contains(&minutes) => Ok(()),
        _ => Err(GbceError::ConfigInvalid {
            section: "index".to_string(),
            key: "vwsp_window_minutes".to_string(),
            reason: format!("vwsp_window_minutes must be a whole number between 1 and {MAX_WINDOW_MINUTES}"),
        }),
    }
}

fn validate_stock_section(config: &dyn ConfigPort, symbol: &str) -> Result<(), GbceError> {
    let class = match config.get_string(symbol, "class") {
        Some(s) => s.parse::<StockClass>().map_err(|e| GbceError::ConfigInvalid {
            section: symbol.to_string(),
            key: "class".to_string(),
            reason: e.to_string(),
        })?,
        None => {
            return Err(GbceError::ConfigMissing {
                section: symbol.to_string(),
                key: "class".to_string(),
            });
        }
    };

    let last_dividend = required_number(config, symbol, "last_dividend")?;
    if last_dividend < 0.0 {
        return Err(invalid(symbol, "last_dividend", "last_dividend must be non-negative"));
    }

    let fixed_dividend = match class {
        StockClass::Preferred => Some(required_number(config, symbol, "fixed_dividend")?),
        StockClass::Common => optional_number(config, symbol, "fixed_dividend")?,
    };
    if fixed_dividend.is_some_and(|v| v < 0.0) {
        return Err(invalid(symbol, "fixed_dividend", "fixed_dividend must be non-negative"));
    }

    let par_value = required_number(config, symbol, "par_value")?;
    if par_value <= 0.0 {
        return Err(invalid(symbol, "par_value", "par_value must be positive"));
    }

    Ok(())
}

fn required_number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, GbceError> {
    optional_number(config, section, key)?.ok_or_else(|| GbceError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, GbceError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(invalid(section, key, &format!("'{}' is not a number", raw.trim()))),
        },
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> GbceError {
    GbceError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
