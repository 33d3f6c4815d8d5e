use crate::models::{CalculationResult, TradeParameters, TradeType};

/// Derive risk amount, stop distance, position size and leverage.
///
/// Total and pure: every singular ratio (zero entry price, entry equal to
/// stop, zero trade amount) reports `0.0` instead of a non-finite value.
pub fn compute(params: &TradeParameters) -> CalculationResult {
    let p = params.sanitized();

    let risk_amount = p.total_capital * p.risk_percentage / 100.0;

    let raw_distance = if p.entry_price == 0.0 {
        0.0
    } else {
        match p.trade_type {
            TradeType::Long => (p.entry_price - p.stop_loss_price) / p.entry_price * 100.0,
            TradeType::Short => (p.stop_loss_price - p.entry_price) / p.entry_price * 100.0,
        }
    };
    // Magnitude only; a stop on the wrong side of entry still yields a distance.
    let distance_to_stop_loss = raw_distance.abs();

    let position_size = if distance_to_stop_loss > 0.0 {
        risk_amount / (distance_to_stop_loss / 100.0)
    } else {
        0.0
    };

    let leverage = if p.trade_amount > 0.0 {
        position_size / p.trade_amount
    } else {
        0.0
    };

    CalculationResult {
        risk_amount: finite_or_zero(risk_amount),
        distance_to_stop_loss: finite_or_zero(distance_to_stop_loss),
        position_size: finite_or_zero(position_size),
        leverage: finite_or_zero(leverage),
    }
}

// Products of huge finite inputs can still overflow.
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::short_params;

    fn params(entry: f64, stop: f64, amount: f64, trade_type: TradeType) -> TradeParameters {
        TradeParameters::new(10000.0, 2.0, entry, stop, amount, trade_type)
    }

    #[test]
    fn long_scenario() {
        let r = compute(&params(100.0, 95.0, 500.0, TradeType::Long));
        assert!((r.risk_amount - 200.0).abs() < 1e-9);
        assert!((r.distance_to_stop_loss - 5.0).abs() < 1e-9);
        assert!((r.position_size - 4000.0).abs() < 1e-6);
        assert!((r.leverage - 8.0).abs() < 1e-9);
    }

    #[test]
    fn short_scenario_mirrors_long() {
        let r = compute(&short_params(100.0, 105.0));
        assert!((r.distance_to_stop_loss - 5.0).abs() < 1e-9);
        assert!((r.position_size - 4000.0).abs() < 1e-6);
        assert!((r.leverage - 8.0).abs() < 1e-9);
    }

    #[test]
    fn zero_entry_price_zeroes_distance_and_size() {
        for t in [TradeType::Long, TradeType::Short] {
            let r = compute(&params(0.0, 95.0, 500.0, t));
            assert_eq!(r.distance_to_stop_loss, 0.0);
            assert_eq!(r.position_size, 0.0);
            assert_eq!(r.leverage, 0.0);
            assert!((r.risk_amount - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn entry_equal_to_stop_zeroes_distance_and_size() {
        let r = compute(&params(100.0, 100.0, 500.0, TradeType::Long));
        assert_eq!(r.distance_to_stop_loss, 0.0);
        assert_eq!(r.position_size, 0.0);
    }

    #[test]
    fn zero_trade_amount_zeroes_leverage() {
        let r = compute(&params(100.0, 95.0, 0.0, TradeType::Long));
        assert_eq!(r.leverage, 0.0);
        assert!((r.position_size - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn distance_is_never_negative() {
        // Stops on the wrong side of entry for each direction.
        let long_wrong = compute(&params(100.0, 110.0, 500.0, TradeType::Long));
        let short_wrong = compute(&params(100.0, 90.0, 500.0, TradeType::Short));
        assert!((long_wrong.distance_to_stop_loss - 10.0).abs() < 1e-9);
        assert!((short_wrong.distance_to_stop_loss - 10.0).abs() < 1e-9);
        assert!(long_wrong.position_size > 0.0);

        for entry in [-50.0, 0.0, 1.0, 100.0, 1e6] {
            for stop in [-10.0, 0.0, 50.0, 100.0, 2e6] {
                for t in [TradeType::Long, TradeType::Short] {
                    let r = compute(&params(entry, stop, 500.0, t));
                    assert!(r.distance_to_stop_loss >= 0.0);
                }
            }
        }
    }

    #[test]
    fn compute_is_deterministic() {
        let p = params(123.456, 117.89, 333.0, TradeType::Short);
        let a = compute(&p);
        let b = compute(&p);
        assert_eq!(a.risk_amount.to_bits(), b.risk_amount.to_bits());
        assert_eq!(a.distance_to_stop_loss.to_bits(), b.distance_to_stop_loss.to_bits());
        assert_eq!(a.position_size.to_bits(), b.position_size.to_bits());
        assert_eq!(a.leverage.to_bits(), b.leverage.to_bits());
    }

    #[test]
    fn non_finite_inputs_are_treated_as_zero() {
        let p = TradeParameters {
            total_capital: f64::NAN,
            risk_percentage: 2.0,
            entry_price: f64::INFINITY,
            stop_loss_price: 95.0,
            trade_amount: 500.0,
            trade_type: TradeType::Long,
        };
        let r = compute(&p);
        assert_eq!(r, CalculationResult::default());
    }

    #[test]
    fn overflowing_products_report_zero() {
        let p = TradeParameters::new(f64::MAX, 200.0, 100.0, 95.0, 1e-300, TradeType::Long);
        let r = compute(&p);
        assert!(r.risk_amount.is_finite());
        assert!(r.position_size.is_finite());
        assert!(r.leverage.is_finite());
    }
}
