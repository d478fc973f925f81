//! Display formatting for amounts and share counts.
//!
//! Used only at the presentation and export boundary; calculations keep full
//! floating-point precision.

use crate::types::{FeeModel, TargetOutcome};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rendered in place of any non-finite value.
pub const PLACEHOLDER: &str = "—";

/// Share counts this close to an integer render without decimals.
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Required notionals above this are reported as impractical.
pub const IMPRACTICAL_NOTIONAL: f64 = 1e15;

/// Format a dollar amount with two decimals and thousands separators.
///
/// `1234.5` renders as `$1,234.50`, `-3.2` as `-$3.20`. Half cents round
/// away from zero, so `4.125` renders as `$4.13`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let fixed = round_cents(value.abs());
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&fixed))
}

/// Format a share count.
///
/// Whole numbers (within `1e-9`) render without decimals; anything else is
/// truncated, not rounded, to one decimal place.
pub fn format_shares(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let rounded = value.round();
    if (value - rounded).abs() < INTEGER_TOLERANCE {
        // + 0.0 folds negative zero
        return with_sign(rounded + 0.0, &format!("{:.0}", (rounded + 0.0).abs()));
    }

    let floored = (value * 10.0).floor() / 10.0;
    with_sign(floored, &format!("{:.1}", floored.abs()))
}

/// Format a fractional fee rate as a percentage, e.g. `0.015` as `1.5%`.
pub fn format_fee_percent(pct_fee: f64) -> String {
    let percent = pct_fee * 100.0;
    if percent.is_finite() {
        format!("{}%", percent)
    } else {
        format!("{}%", PLACEHOLDER)
    }
}

/// One-line description of a target-average solve.
pub fn target_summary(outcome: &TargetOutcome, price: f64, fees: &FeeModel) -> String {
    match outcome {
        TargetOutcome::RequiresSale { .. } => {
            "Given your target and this price, you'd need to SELL to reach that average."
                .to_string()
        }
        TargetOutcome::Reached {
            required_notional, ..
        } if *required_notional > IMPRACTICAL_NOTIONAL => impractical_message(),
        TargetOutcome::Impractical => impractical_message(),
        TargetOutcome::Reached {
            required_notional,
            result,
        } => format!(
            "Invest {} (fees {}) to buy {} shares at {}; new average {} on {} shares.",
            format_currency(*required_notional),
            format_currency(fees.fees_on(*required_notional)),
            format_shares(required_notional / price),
            format_currency(price),
            format_currency(result.new_average),
            format_shares(result.total_shares),
        ),
    }
}

/// Round to two decimals, half away from zero, on the shortest decimal form
/// of `value`. Values outside the `Decimal` range keep std formatting.
fn round_cents(value: f64) -> String {
    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => format!(
            "{:.2}",
            decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", value),
    }
}

fn impractical_message() -> String {
    "At this price, the target average is asymptotic; you'd need an impractically large investment."
        .to_string()
}

fn with_sign(value: f64, digits: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(digits))
}

/// Insert commas between groups of three integer digits of an unsigned decimal string.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.find('.') {
        Some(idx) => digits.split_at(idx),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(digits.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(frac_part);
    grouped
}
