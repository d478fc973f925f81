//! Calculator form state.
//!
//! The raw text of every input field, kept as typed so it can be persisted
//! and restored between sessions.

use crate::input::{parse_fee_model, parse_required};
use crate::types::{Position, ScenarioInputs, TradeMode, TradeSpec};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Raw calculator inputs. `Default` is the blank, freshly reset form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub current_shares: String,
    pub current_avg: String,
    pub price: String,
    pub mode: TradeMode,
    pub invest_amount: String,
    pub add_shares: String,
    pub target_avg: String,
    /// Fixed fee in dollars
    pub fee_fixed: String,
    /// Proportional fee in percent (0..100)
    pub fee_pct: String,
}

impl FormState {
    /// Parse the form into calculation inputs.
    ///
    /// Only the amount field belonging to the selected mode is read. Fee
    /// fields may be blank. Range checks are left to the engine.
    pub fn parse(&self) -> Result<ScenarioInputs> {
        let position = Position::new(
            parse_required("current shares", &self.current_shares)?,
            parse_required("current average", &self.current_avg)?,
        );
        let price = parse_required("price", &self.price)?;
        let fees = parse_fee_model(&self.fee_fixed, &self.fee_pct)?;

        let trade = match self.mode {
            TradeMode::Invest => TradeSpec::Invest {
                cash_amount: parse_required("invest amount", &self.invest_amount)?,
            },
            TradeMode::Shares => TradeSpec::Shares {
                quantity: parse_required("shares to add", &self.add_shares)?,
            },
            TradeMode::Target => TradeSpec::TargetAverage {
                target: parse_required("target average", &self.target_avg)?,
            },
        };

        Ok(ScenarioInputs::new(position, price, fees, trade))
    }

    /// Clear every field. The selected mode is kept.
    pub fn reset(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }
}
