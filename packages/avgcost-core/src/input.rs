//! Parsing of user-entered numbers.

use crate::types::FeeModel;
use crate::{Error, Result};

/// Parse a decimal number typed by a user.
///
/// Surrounding whitespace is ignored and a comma is accepted as the decimal
/// point (`"4,5"` parses as `4.5`). Blank input yields `Ok(None)`.
pub fn parse_decimal(field: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = trimmed.replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(Error::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parse a field that must be present.
pub fn parse_required(field: &str, raw: &str) -> Result<f64> {
    parse_decimal(field, raw)?.ok_or_else(|| Error::MissingField(field.to_string()))
}

/// Build a fee model from a fixed fee in dollars and a percentage (0..100).
///
/// Blank fields mean no fee.
pub fn parse_fee_model(fixed_fee: &str, pct_fee_percent: &str) -> Result<FeeModel> {
    let fixed = parse_decimal("fixed fee", fixed_fee)?.unwrap_or(0.0);
    let percent = parse_decimal("fee percentage", pct_fee_percent)?.unwrap_or(0.0);

    if fixed < 0.0 {
        return Err(Error::InvalidNumber {
            field: "fixed fee".to_string(),
            value: fixed_fee.to_string(),
        });
    }
    if percent < 0.0 {
        return Err(Error::InvalidNumber {
            field: "fee percentage".to_string(),
            value: pct_fee_percent.to_string(),
        });
    }

    Ok(FeeModel::new(fixed, percent / 100.0))
}
