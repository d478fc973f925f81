//! Fee application shared by every trade mode.

use crate::types::FeeModel;

/// Cost of a trade: its notional plus the fixed fee plus the proportional fee.
///
/// Fees always add to the cost basis; there is no sell-side modeling.
pub fn cost(notional: f64, fixed_fee: f64, pct_fee: f64) -> f64 {
    notional + fixed_fee + notional * pct_fee
}

impl FeeModel {
    /// Cost of a trade with the given pre-fee notional under this fee model.
    pub fn cost(&self, notional: f64) -> f64 {
        cost(notional, self.fixed_fee, self.pct_fee)
    }

    /// Fees charged on the given notional.
    pub fn fees_on(&self, notional: f64) -> f64 {
        self.fixed_fee + notional * self.pct_fee
    }
}
