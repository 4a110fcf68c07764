use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Percentage change from `previous` to `current`.
///
/// A zero baseline reports `0` whatever `current` is, so a brand-new income
/// stream never shows as infinite growth. Results that would overflow the
/// decimal range saturate towards the sign of the change.
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    let delta = current.saturating_sub(previous);
    let ratio = match delta.checked_div(previous) {
        Some(ratio) => ratio,
        None if delta.is_sign_negative() == previous.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    };
    ratio.saturating_mul(Decimal::ONE_HUNDRED)
}

/// Direction of a period-over-period change, for arrows and badges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn of(change: Decimal) -> Self {
        if change.is_zero() {
            TrendDirection::Flat
        } else if change.is_sign_positive() {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(units: i64) -> Decimal {
        Decimal::new(units, 0)
    }

    #[test]
    fn zero_baseline_reports_no_change() {
        for current in [d(0), d(1), d(-5), Decimal::MAX, Decimal::MIN] {
            assert_eq!(percent_change(current, Decimal::ZERO), Decimal::ZERO);
        }
    }

    #[test]
    fn equal_periods_report_no_change() {
        for value in [d(1), d(-7), Decimal::new(12345, 2), Decimal::MAX] {
            assert_eq!(percent_change(value, value), Decimal::ZERO);
        }
    }

    #[test]
    fn growth_and_decline() {
        assert_eq!(percent_change(d(150), d(100)), d(50));
        assert_eq!(percent_change(d(50), d(100)), d(-50));
        assert_eq!(percent_change(d(0), d(100)), d(-100));
    }

    #[test]
    fn extreme_inputs_do_not_panic() {
        let huge = percent_change(Decimal::MAX, Decimal::new(1, 20));
        assert_eq!(huge, Decimal::MAX);
        let plunge = percent_change(Decimal::MIN, Decimal::new(1, 20));
        assert_eq!(plunge, Decimal::MIN);
    }

    #[test]
    fn direction_follows_sign() {
        assert_eq!(TrendDirection::of(d(3)), TrendDirection::Up);
        assert_eq!(TrendDirection::of(d(-3)), TrendDirection::Down);
        assert_eq!(TrendDirection::of(Decimal::ZERO), TrendDirection::Flat);
    }
}
