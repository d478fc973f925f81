//! Scenario records: immutable snapshots of one calculation.

use crate::types::{CalcResult, Calculation, ScenarioInputs, TargetOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a recorded calculation turned out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// The trade produced a new position.
    Computed,
    /// The target average can only be reached by selling.
    RequiresSale,
    /// The target average is asymptotic at this price.
    Impractical,
    /// The inputs were rejected by the engine.
    Invalid { reason: String },
}

/// One computed what-if trade. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioRecord {
    inputs: ScenarioInputs,
    status: ScenarioStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<CalcResult>,
    created_at: DateTime<Utc>,
}

impl ScenarioRecord {
    /// Run the calculation for `inputs` and snapshot it with the given timestamp.
    pub fn evaluate(inputs: ScenarioInputs, created_at: DateTime<Utc>) -> Self {
        let (status, result) = match inputs.compute() {
            Ok(calculation) => Self::classify(&calculation),
            Err(err) => (
                ScenarioStatus::Invalid {
                    reason: err.to_string(),
                },
                None,
            ),
        };

        Self {
            inputs,
            status,
            result,
            created_at,
        }
    }

    /// Like [`ScenarioRecord::evaluate`], stamped with the current time.
    pub fn now(inputs: ScenarioInputs) -> Self {
        Self::evaluate(inputs, Utc::now())
    }

    fn classify(calculation: &Calculation) -> (ScenarioStatus, Option<CalcResult>) {
        match calculation {
            Calculation::Invest(result) | Calculation::Shares(result) => {
                (ScenarioStatus::Computed, Some(*result))
            }
            Calculation::Target(TargetOutcome::Reached { result, .. }) => {
                (ScenarioStatus::Computed, Some(*result))
            }
            Calculation::Target(TargetOutcome::RequiresSale { .. }) => {
                (ScenarioStatus::RequiresSale, None)
            }
            Calculation::Target(TargetOutcome::Impractical) => (ScenarioStatus::Impractical, None),
        }
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    /// Position figures after the trade; `None` for sale, impractical or invalid scenarios.
    pub fn result(&self) -> Option<&CalcResult> {
        self.result.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the record may be committed to a ledger.
    ///
    /// Invalid inputs are refused, as is any non-finite figure except the
    /// blank result of a sale or impractical target.
    pub fn is_valid(&self) -> bool {
        let inputs = &self.inputs;
        let inputs_finite = inputs.position.shares.is_finite()
            && inputs.position.avg_cost.is_finite()
            && inputs.price.is_finite()
            && inputs.fees.fixed_fee.is_finite()
            && inputs.fees.pct_fee.is_finite()
            && inputs.trade.amount().is_finite();
        if !inputs_finite {
            return false;
        }

        match (&self.status, &self.result) {
            (ScenarioStatus::Computed, Some(result)) => result.is_finite(),
            (ScenarioStatus::RequiresSale | ScenarioStatus::Impractical, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeModel, Position, TradeSpec};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn inputs(trade: TradeSpec) -> ScenarioInputs {
        ScenarioInputs::new(Position::new(10.0, 5.0), 4.0, FeeModel::zero(), trade)
    }

    #[test]
    fn test_computed_record() {
        let record = ScenarioRecord::evaluate(inputs(TradeSpec::Shares { quantity: 10.0 }), at());
        assert_eq!(record.status(), &ScenarioStatus::Computed);
        assert_eq!(record.result().unwrap().new_average, 4.5);
        assert_eq!(record.created_at(), at());
        assert!(record.is_valid());
    }

    #[test]
    fn test_sale_record_is_valid_without_result() {
        let record = ScenarioRecord::evaluate(
            inputs(TradeSpec::TargetAverage { target: 3.0 }),
            at(),
        );
        assert_eq!(record.status(), &ScenarioStatus::RequiresSale);
        assert!(record.result().is_none());
        assert!(record.is_valid());
    }

    #[test]
    fn test_impractical_record() {
        let record = ScenarioRecord::evaluate(
            inputs(TradeSpec::TargetAverage { target: 4.0 }),
            at(),
        );
        assert_eq!(record.status(), &ScenarioStatus::Impractical);
        assert!(record.is_valid());
    }

    #[test]
    fn test_invalid_record() {
        let record = ScenarioRecord::evaluate(
            inputs(TradeSpec::Invest { cash_amount: -5.0 }),
            at(),
        );
        assert!(matches!(record.status(), ScenarioStatus::Invalid { reason } if reason.contains("cash amount")));
        assert!(!record.is_valid());
    }

    #[test]
    fn test_tampered_record_is_invalid() {
        let json = r#"{
            "inputs": {
                "position": {"shares": 10.0, "avg_cost": 5.0},
                "price": 4.0,
                "fees": {"fixed_fee": 0.0, "pct_fee": 0.0},
                "trade": {"mode": "shares", "quantity": 10.0}
            },
            "status": {"kind": "computed"},
            "created_at": "2024-03-01T12:00:00Z"
        }"#;
        let record: ScenarioRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_valid());
    }

    #[test]
    fn test_serde_round_trip_keeps_snapshot() {
        let record = ScenarioRecord::evaluate(inputs(TradeSpec::Invest { cash_amount: 40.0 }), at());
        let json = serde_json::to_string(&record).unwrap();
        let back: ScenarioRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
