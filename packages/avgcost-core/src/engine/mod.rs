//! Cost-basis engine.
//!
//! Pure, synchronous functions that turn a position, a price, a fee model and
//! a trade specification into the blended average cost after the trade:
//!
//! - **Invest**: deploy a cash amount (fees excluded)
//! - **Shares**: buy a fixed number of shares
//! - **Target average**: solve for the cash needed to reach a target average

mod calc;
mod fees;

pub use calc::{compute, compute_invest, compute_shares, compute_target_average};
pub use fees::cost;

/// Reasons a calculation cannot produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("No shares held after the trade, average cost is undefined")]
    UndefinedAverage,

    #[error("Result is too large to represent")]
    Overflow,
}
