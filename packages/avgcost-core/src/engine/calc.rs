//! Average cost calculations for the three trade modes.

use super::CalcError;
use crate::types::{CalcResult, Calculation, FeeModel, Position, TargetOutcome, TradeSpec};

/// Below this magnitude the target-average denominator is treated as zero.
const DENOM_EPSILON: f64 = 1e-12;

/// New average after investing `cash_amount` (fees excluded) at `price`.
///
/// # Arguments
///
/// * `position` - Shares and average cost held before the trade
/// * `price` - Execution price per share, must be positive
/// * `fees` - Fee model applied to the invested cash
/// * `cash_amount` - Cash to deploy before fees, must be non-negative
pub fn compute_invest(
    position: &Position,
    price: f64,
    fees: &FeeModel,
    cash_amount: f64,
) -> Result<CalcResult, CalcError> {
    validate_common(position, price, fees)?;
    non_negative("cash amount", cash_amount)?;

    let added_shares = cash_amount / price;
    settle(position, added_shares, fees.cost(cash_amount))
}

/// New average after buying `quantity` shares at `price`.
pub fn compute_shares(
    position: &Position,
    price: f64,
    fees: &FeeModel,
    quantity: f64,
) -> Result<CalcResult, CalcError> {
    validate_common(position, price, fees)?;
    non_negative("quantity", quantity)?;

    let notional = quantity * price;
    settle(position, quantity, fees.cost(notional))
}

/// Solve for the pre-fee notional that brings the average cost to `target`.
///
/// With `S` shares at average `P`, price `p`, fixed fee `f` and fee rate `r`,
/// buying notional `x` gives `(S*P + (1+r)*x + f) / (S + x/p)`. Setting that
/// equal to `T` and solving:
///
/// ```text
/// x = (T*S - S*P - f) / ((1 + r) - T/p)
/// ```
///
/// A vanishing denominator yields [`TargetOutcome::Impractical`]; a negative
/// `x` yields [`TargetOutcome::RequiresSale`]. `x == 0` counts as reached.
pub fn compute_target_average(
    position: &Position,
    price: f64,
    fees: &FeeModel,
    target: f64,
) -> Result<TargetOutcome, CalcError> {
    validate_common(position, price, fees)?;
    finite("target average", target)?;
    if target <= 0.0 {
        return Err(CalcError::NotPositive {
            field: "target average",
        });
    }

    let s = position.shares;
    let p = position.avg_cost;
    let denom = (1.0 + fees.pct_fee) - target / price;
    if denom.abs() < DENOM_EPSILON {
        return Ok(TargetOutcome::Impractical);
    }

    let x = (target * s - s * p - fees.fixed_fee) / denom;
    if !x.is_finite() {
        return Ok(TargetOutcome::Impractical);
    }
    if x < 0.0 {
        return Ok(TargetOutcome::RequiresSale {
            required_notional: x,
        });
    }

    let result = settle(position, x / price, fees.cost(x))?;
    Ok(TargetOutcome::Reached {
        required_notional: x,
        result,
    })
}

/// Run the calculation matching `trade`.
pub fn compute(
    position: &Position,
    price: f64,
    fees: &FeeModel,
    trade: &TradeSpec,
) -> Result<Calculation, CalcError> {
    let calculation = match *trade {
        TradeSpec::Invest { cash_amount } => {
            Calculation::Invest(compute_invest(position, price, fees, cash_amount)?)
        }
        TradeSpec::Shares { quantity } => {
            Calculation::Shares(compute_shares(position, price, fees, quantity)?)
        }
        TradeSpec::TargetAverage { target } => {
            Calculation::Target(compute_target_average(position, price, fees, target)?)
        }
    };

    tracing::debug!(mode = %trade.mode(), ?calculation, "computed trade");
    Ok(calculation)
}

fn settle(
    position: &Position,
    added_shares: f64,
    trade_cost: f64,
) -> Result<CalcResult, CalcError> {
    let total_cost = position.total_cost() + trade_cost;
    let total_shares = position.shares + added_shares;
    if total_shares == 0.0 {
        return Err(CalcError::UndefinedAverage);
    }

    let result = CalcResult {
        added_shares,
        total_shares,
        total_cost,
        new_average: total_cost / total_shares,
    };
    if !result.is_finite() {
        return Err(CalcError::Overflow);
    }
    Ok(result)
}

fn validate_common(position: &Position, price: f64, fees: &FeeModel) -> Result<(), CalcError> {
    non_negative("current shares", position.shares)?;
    non_negative("current average", position.avg_cost)?;
    finite("price", price)?;
    if price <= 0.0 {
        return Err(CalcError::NotPositive { field: "price" });
    }
    non_negative("fixed fee", fees.fixed_fee)?;
    non_negative("fee percentage", fees.pct_fee)
}

fn non_negative(field: &'static str, value: f64) -> Result<(), CalcError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::Negative { field });
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() {
        return Err(CalcError::NotFinite { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn no_fees() -> FeeModel {
        FeeModel::zero()
    }

    #[test]
    fn test_invest_from_empty_position() {
        let r = compute_invest(&Position::new(0.0, 0.0), 2.0, &no_fees(), 100.0).unwrap();
        assert_abs_diff_eq!(r.new_average, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.total_shares, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.total_cost, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invest_with_fees() {
        let fees = FeeModel::new(2.0, 0.01);
        let r = compute_invest(&Position::new(0.0, 0.0), 10.0, &fees, 100.0).unwrap();
        assert_abs_diff_eq!(r.added_shares, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.total_cost, 103.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.new_average, 10.3, epsilon = 1e-9);
    }

    #[test]
    fn test_invest_zero_fees_is_exact() {
        let cases = [
            (0.0, 0.0, 250.0, 12.5),
            (10.0, 5.0, 40.0, 4.0),
            (3.5, 120.25, 1000.0, 97.3),
            (1e6, 0.01, 0.0, 0.5),
        ];
        for (s, p, m, price) in cases {
            let r = compute_invest(&Position::new(s, p), price, &no_fees(), m).unwrap();
            assert_eq!(r.added_shares, m / price);
            assert_eq!(r.total_cost, s * p + m);
            assert_eq!(r.total_shares, s + m / price);
        }
    }

    #[test]
    fn test_shares_scenario() {
        let r = compute_shares(&Position::new(10.0, 5.0), 4.0, &no_fees(), 10.0).unwrap();
        assert_eq!(r.new_average, 4.5);
        assert_eq!(r.total_shares, 20.0);
        assert_eq!(r.total_cost, 90.0);
        assert_eq!(r.added_shares, 10.0);
    }

    #[test]
    fn test_shares_and_invest_agree_without_fees() {
        let position = Position::new(37.0, 81.4);
        for (quantity, price) in [(1.0, 80.0), (12.5, 64.2), (300.0, 99.99)] {
            let by_shares = compute_shares(&position, price, &no_fees(), quantity).unwrap();
            let by_cash =
                compute_invest(&position, price, &no_fees(), quantity * price).unwrap();
            assert_abs_diff_eq!(by_shares.total_shares, by_cash.total_shares, epsilon = 1e-9);
            assert_abs_diff_eq!(by_shares.total_cost, by_cash.total_cost, epsilon = 1e-9);
            assert_abs_diff_eq!(by_shares.new_average, by_cash.new_average, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_shares_fee_on_notional() {
        let fees = FeeModel::new(1.0, 0.005);
        let r = compute_shares(&Position::new(0.0, 0.0), 20.0, &fees, 10.0).unwrap();
        // 200 + 1 + 1
        assert_abs_diff_eq!(r.total_cost, 202.0, epsilon = 1e-9);
    }

    #[test]
    fn test_target_scenario_round_trip() {
        let position = Position::new(10.0, 5.0);
        let outcome = compute_target_average(&position, 4.0, &no_fees(), 4.5).unwrap();
        assert_abs_diff_eq!(outcome.required_notional(), 40.0, epsilon = 1e-9);

        let result = outcome.result().unwrap();
        assert_abs_diff_eq!(result.new_average, 4.5, epsilon = 1e-9);

        let replay =
            compute_invest(&position, 4.0, &no_fees(), outcome.required_notional()).unwrap();
        assert_abs_diff_eq!(replay.new_average, 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_target_round_trip_with_fees() {
        let fees = FeeModel::new(4.95, 0.002);
        let cases = [
            (100.0, 50.0, 40.0, 45.0),
            (12.0, 210.0, 150.0, 190.0),
            (0.0, 0.0, 25.0, 30.0),
        ];
        for (s, p, price, target) in cases {
            let position = Position::new(s, p);
            let outcome = compute_target_average(&position, price, &fees, target).unwrap();
            let x = outcome.required_notional();
            assert!(x.is_finite() && x >= 0.0, "expected reachable target, got {x}");

            let replay = compute_invest(&position, price, &fees, x).unwrap();
            assert_abs_diff_eq!(replay.new_average, target, epsilon = 1e-9);
            assert_eq!(outcome.result(), Some(&replay));
        }
    }

    #[test]
    fn test_target_requires_sale() {
        // A target of 3.0 sits below the 4.0 price; no purchase can pull the average there.
        let outcome =
            compute_target_average(&Position::new(10.0, 5.0), 4.0, &no_fees(), 3.0).unwrap();
        assert!(matches!(outcome, TargetOutcome::RequiresSale { .. }));
        assert!(outcome.required_notional() < 0.0);
        assert!(outcome.result().is_none());
    }

    #[test]
    fn test_target_impractical_when_target_equals_price() {
        let outcome =
            compute_target_average(&Position::new(10.0, 5.0), 4.0, &no_fees(), 4.0).unwrap();
        assert_eq!(outcome, TargetOutcome::Impractical);
        assert_eq!(outcome.required_notional(), f64::INFINITY);
    }

    #[test]
    fn test_target_impractical_accounts_for_fee_rate() {
        // (1 + r) - T/p == 0 when T = p * (1 + r)
        let fees = FeeModel::new(0.0, 0.25);
        let outcome =
            compute_target_average(&Position::new(10.0, 5.0), 4.0, &fees, 5.0).unwrap();
        assert_eq!(outcome, TargetOutcome::Impractical);
    }

    #[test]
    fn test_target_already_met_is_reached_with_zero_notional() {
        let outcome =
            compute_target_average(&Position::new(10.0, 5.0), 4.0, &no_fees(), 5.0).unwrap();
        match outcome {
            TargetOutcome::Reached {
                required_notional,
                result,
            } => {
                assert_eq!(required_notional, 0.0);
                assert_eq!(result.added_shares, 0.0);
                assert_eq!(result.new_average, 5.0);
            }
            other => panic!("expected reached, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let fees = no_fees();
        let pos = Position::new(10.0, 5.0);

        assert_eq!(
            compute_invest(&Position::new(-1.0, 5.0), 4.0, &fees, 10.0),
            Err(CalcError::Negative {
                field: "current shares"
            })
        );
        assert_eq!(
            compute_invest(&Position::new(1.0, -5.0), 4.0, &fees, 10.0),
            Err(CalcError::Negative {
                field: "current average"
            })
        );
        assert_eq!(
            compute_invest(&pos, 0.0, &fees, 10.0),
            Err(CalcError::NotPositive { field: "price" })
        );
        assert_eq!(
            compute_invest(&pos, 4.0, &fees, -10.0),
            Err(CalcError::Negative {
                field: "cash amount"
            })
        );
        assert_eq!(
            compute_shares(&pos, 4.0, &fees, -1.0),
            Err(CalcError::Negative { field: "quantity" })
        );
        assert_eq!(
            compute_target_average(&pos, 4.0, &fees, 0.0),
            Err(CalcError::NotPositive {
                field: "target average"
            })
        );
        assert_eq!(
            compute_shares(&pos, f64::NAN, &fees, 1.0),
            Err(CalcError::NotFinite { field: "price" })
        );
        assert_eq!(
            compute_shares(&pos, 4.0, &FeeModel::new(-1.0, 0.0), 1.0),
            Err(CalcError::Negative { field: "fixed fee" })
        );
    }

    #[test]
    fn test_empty_result_has_no_average() {
        let r = compute_invest(&Position::new(0.0, 0.0), 10.0, &no_fees(), 0.0);
        assert_eq!(r, Err(CalcError::UndefinedAverage));

        let t = compute_target_average(&Position::new(0.0, 0.0), 10.0, &no_fees(), 12.0);
        assert_eq!(t, Err(CalcError::UndefinedAverage));
    }

    #[test]
    fn test_average_moves_toward_trade_price() {
        let position = Position::new(50.0, 20.0);
        let cash = 500.0;

        let mut previous = f64::NEG_INFINITY;
        for price in [5.0, 10.0, 15.0, 20.0, 25.0, 40.0, 80.0] {
            let r = compute_invest(&position, price, &no_fees(), cash).unwrap();
            assert!(r.new_average >= previous);
            previous = r.new_average;

            if price >= position.avg_cost {
                assert!(r.new_average >= position.avg_cost && r.new_average <= price);
            } else {
                assert!(r.new_average <= position.avg_cost && r.new_average >= price);
            }
        }
    }

    #[test]
    fn test_compute_dispatches_by_mode() {
        let position = Position::new(10.0, 5.0);
        let fees = no_fees();

        let calc = compute(&position, 4.0, &fees, &TradeSpec::Shares { quantity: 10.0 }).unwrap();
        assert!(matches!(calc, Calculation::Shares(_)));
        assert_eq!(calc.result().unwrap().new_average, 4.5);

        let calc =
            compute(&position, 4.0, &fees, &TradeSpec::Invest { cash_amount: 40.0 }).unwrap();
        assert!(matches!(calc, Calculation::Invest(_)));

        let calc =
            compute(&position, 4.0, &fees, &TradeSpec::TargetAverage { target: 3.0 }).unwrap();
        assert!(matches!(
            calc,
            Calculation::Target(TargetOutcome::RequiresSale { .. })
        ));
        assert!(calc.result().is_none());
    }
}
