//! Core data types for the average cost calculator.

use crate::engine::{self, CalcError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The holder's position before a trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    /// Number of shares currently held
    pub shares: f64,
    /// Average cost per share
    pub avg_cost: f64,
}

impl Position {
    /// Create a new position with the given share count and average cost.
    pub fn new(shares: f64, avg_cost: f64) -> Self {
        Self { shares, avg_cost }
    }

    /// Total cost basis of the position.
    pub fn total_cost(&self) -> f64 {
        self.shares * self.avg_cost
    }
}

/// Trading fees applied to every trade's notional value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct FeeModel {
    /// Flat fee per trade, in dollars
    pub fixed_fee: f64,
    /// Proportional fee as a fraction of notional (0.01 = 1%)
    pub pct_fee: f64,
}

impl FeeModel {
    /// Create a fee model. `pct_fee` is a fraction, not a percentage.
    pub fn new(fixed_fee: f64, pct_fee: f64) -> Self {
        Self { fixed_fee, pct_fee }
    }

    /// A fee model that charges nothing.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Proportional fee expressed as a percentage (1.0 = 1%).
    pub fn pct_fee_percent(&self) -> f64 {
        self.pct_fee * 100.0
    }
}

/// Which quantity the user fixes when sizing a trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
    #[default]
    Invest,
    Shares,
    Target,
}

impl TradeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeMode::Invest => "invest",
            TradeMode::Shares => "shares",
            TradeMode::Target => "target",
        }
    }
}

impl fmt::Display for TradeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed purchase, specified in one of three ways.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TradeSpec {
    /// Deploy a fixed amount of cash, fees excluded.
    Invest { cash_amount: f64 },
    /// Buy a fixed number of shares.
    Shares { quantity: f64 },
    /// Buy whatever it takes to land on this average cost.
    #[serde(rename = "target")]
    TargetAverage { target: f64 },
}

impl TradeSpec {
    pub fn mode(&self) -> TradeMode {
        match self {
            TradeSpec::Invest { .. } => TradeMode::Invest,
            TradeSpec::Shares { .. } => TradeMode::Shares,
            TradeSpec::TargetAverage { .. } => TradeMode::Target,
        }
    }

    /// The cash amount, share quantity or target average, depending on the mode.
    pub fn amount(&self) -> f64 {
        match *self {
            TradeSpec::Invest { cash_amount } => cash_amount,
            TradeSpec::Shares { quantity } => quantity,
            TradeSpec::TargetAverage { target } => target,
        }
    }
}

/// Everything needed to run one calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioInputs {
    pub position: Position,
    /// Execution price per share
    pub price: f64,
    pub fees: FeeModel,
    pub trade: TradeSpec,
}

impl ScenarioInputs {
    pub fn new(position: Position, price: f64, fees: FeeModel, trade: TradeSpec) -> Self {
        Self {
            position,
            price,
            fees,
            trade,
        }
    }

    /// Run the calculation for these inputs.
    pub fn compute(&self) -> std::result::Result<Calculation, CalcError> {
        engine::compute(&self.position, self.price, &self.fees, &self.trade)
    }
}

/// Outcome of a successful trade calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalcResult {
    /// Shares acquired by the trade
    pub added_shares: f64,
    /// Shares held after the trade
    pub total_shares: f64,
    /// Cost basis after the trade, fees included
    pub total_cost: f64,
    /// Average cost per share after the trade
    pub new_average: f64,
}

impl CalcResult {
    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.added_shares.is_finite()
            && self.total_shares.is_finite()
            && self.total_cost.is_finite()
            && self.new_average.is_finite()
    }
}

/// Result of solving for a target average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// A purchase of `required_notional` (before fees) reaches the target.
    Reached {
        required_notional: f64,
        result: CalcResult,
    },
    /// The target sits at or beyond what buying can achieve; the holder would have to sell.
    RequiresSale { required_notional: f64 },
    /// The target is asymptotic at this price net of the fee rate.
    Impractical,
}

impl TargetOutcome {
    /// Pre-fee notional the solve produced. `+inf` for an impractical target,
    /// negative when a sale would be required.
    pub fn required_notional(&self) -> f64 {
        match *self {
            TargetOutcome::Reached {
                required_notional, ..
            } => required_notional,
            TargetOutcome::RequiresSale { required_notional } => required_notional,
            TargetOutcome::Impractical => f64::INFINITY,
        }
    }

    pub fn result(&self) -> Option<&CalcResult> {
        match self {
            TargetOutcome::Reached { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// A calculation for any trade mode.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Calculation {
    Invest(CalcResult),
    Shares(CalcResult),
    Target(TargetOutcome),
}

impl Calculation {
    pub fn mode(&self) -> TradeMode {
        match self {
            Calculation::Invest(_) => TradeMode::Invest,
            Calculation::Shares(_) => TradeMode::Shares,
            Calculation::Target(_) => TradeMode::Target,
        }
    }

    /// The resulting position figures, if the trade is a purchase that can happen.
    pub fn result(&self) -> Option<&CalcResult> {
        match self {
            Calculation::Invest(result) | Calculation::Shares(result) => Some(result),
            Calculation::Target(outcome) => outcome.result(),
        }
    }
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
