//! Non-authoritative tax approximations.
//!
//! Rates are placeholders carried in [`TaxPolicy`] so a jurisdiction-correct
//! policy can be injected from configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 15.3% self-employment rate.
pub const SELF_EMPLOYMENT_RATE: Decimal = Decimal::from_parts(153, 0, 0, false, 3);

/// 25% default income tax bracket.
pub const DEFAULT_INCOME_TAX_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Default sales tax applied to new invoices, in percent.
pub const DEFAULT_INVOICE_TAX_PERCENT: Decimal = Decimal::ZERO;

/// `amount × rate_percent / 100`, unrounded.
pub fn simple_tax(amount: Decimal, rate_percent: Decimal) -> Decimal {
    amount.saturating_mul(rate_percent) / Decimal::ONE_HUNDRED
}

/// Self-employment plus income tax on `income − expenses`; zero when there is
/// no profit. Uses the fixed 15.3% self-employment rate.
pub fn self_employment_style_tax(
    income: Decimal,
    expenses: Decimal,
    income_tax_rate: Decimal,
) -> Decimal {
    TaxPolicy {
        income_tax_rate,
        ..TaxPolicy::default()
    }
    .estimate(income, expenses)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxPolicy {
    pub self_employment_rate: Decimal,
    pub income_tax_rate: Decimal,
    pub invoice_tax_percent: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            self_employment_rate: SELF_EMPLOYMENT_RATE,
            income_tax_rate: DEFAULT_INCOME_TAX_RATE,
            invoice_tax_percent: DEFAULT_INVOICE_TAX_PERCENT,
        }
    }
}

impl TaxPolicy {
    pub fn estimate(&self, income: Decimal, expenses: Decimal) -> Decimal {
        self.breakdown(income, expenses).total
    }

    pub fn breakdown(&self, income: Decimal, expenses: Decimal) -> TaxBreakdown {
        let profit = income.saturating_sub(expenses);
        if profit <= Decimal::ZERO {
            return TaxBreakdown::default();
        }
        let self_employment = profit.saturating_mul(self.self_employment_rate);
        let income_tax = profit.saturating_mul(self.income_tax_rate);
        TaxBreakdown {
            profit,
            self_employment,
            income_tax,
            total: self_employment.saturating_add(income_tax),
        }
    }

    /// Combined marginal rate applied to profit.
    pub fn effective_rate(&self) -> Decimal {
        self.self_employment_rate
            .saturating_add(self.income_tax_rate)
    }

    /// Tax avoided by deducting `deductible_total` from profit at the
    /// combined marginal rate. Never negative.
    pub fn deduction_savings(&self, deductible_total: Decimal) -> Decimal {
        if deductible_total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        deductible_total.saturating_mul(self.effective_rate())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub profit: Decimal,
    pub self_employment: Decimal,
    pub income_tax: Decimal,
    pub total: Decimal,
}

/// Period projections. These scale an already-computed figure and are kept
/// apart from the estimator.
pub mod projection {
    use rust_decimal::Decimal;

    const MONTHS_PER_QUARTER: i64 = 3;
    const QUARTERS_PER_YEAR: i64 = 4;
    const MONTHS_PER_YEAR: i64 = 12;

    pub fn quarterly_from_monthly(monthly: Decimal) -> Decimal {
        monthly.saturating_mul(Decimal::from(MONTHS_PER_QUARTER))
    }

    pub fn annual_from_quarterly(quarterly: Decimal) -> Decimal {
        quarterly.saturating_mul(Decimal::from(QUARTERS_PER_YEAR))
    }

    pub fn annual_from_monthly(monthly: Decimal) -> Decimal {
        monthly.saturating_mul(Decimal::from(MONTHS_PER_YEAR))
    }

    /// Even quarterly instalment of an annual figure.
    pub fn quarterly_installment(annual: Decimal) -> Decimal {
        annual / Decimal::from(QUARTERS_PER_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(units: i64) -> Decimal {
        Decimal::new(units, 0)
    }

    #[test]
    fn simple_tax_is_plain_multiplication() {
        assert_eq!(simple_tax(d(200), d(10)), d(20));
        assert_eq!(simple_tax(d(99), Decimal::new(825, 2)), Decimal::new(81675, 4));
        assert_eq!(simple_tax(Decimal::ZERO, d(30)), Decimal::ZERO);
    }

    #[test]
    fn self_employment_scenario() {
        let tax = self_employment_style_tax(d(1000), d(400), DEFAULT_INCOME_TAX_RATE);
        assert_eq!(tax, Decimal::new(2418, 1));

        let breakdown = TaxPolicy::default().breakdown(d(1000), d(400));
        assert_eq!(breakdown.profit, d(600));
        assert_eq!(breakdown.self_employment, Decimal::new(918, 1));
        assert_eq!(breakdown.income_tax, d(150));
    }

    #[test]
    fn no_profit_means_no_tax() {
        assert_eq!(self_employment_style_tax(d(400), d(400), DEFAULT_INCOME_TAX_RATE), Decimal::ZERO);
        assert_eq!(self_employment_style_tax(d(100), d(900), DEFAULT_INCOME_TAX_RATE), Decimal::ZERO);
        assert_eq!(self_employment_style_tax(Decimal::ZERO, Decimal::ZERO, DEFAULT_INCOME_TAX_RATE), Decimal::ZERO);
    }

    #[test]
    fn custom_policy_replaces_rates() {
        let policy = TaxPolicy {
            self_employment_rate: Decimal::ZERO,
            income_tax_rate: Decimal::new(1, 1),
            invoice_tax_percent: Decimal::ZERO,
        };
        assert_eq!(policy.estimate(d(1000), d(0)), d(100));
        assert_eq!(policy.deduction_savings(d(50)), d(5));
        assert_eq!(policy.deduction_savings(d(-50)), Decimal::ZERO);
    }

    #[test]
    fn projections_scale_by_period() {
        assert_eq!(projection::quarterly_from_monthly(d(100)), d(300));
        assert_eq!(projection::annual_from_quarterly(d(300)), d(1200));
        assert_eq!(projection::annual_from_monthly(d(100)), d(1200));
        assert_eq!(projection::quarterly_installment(d(1200)), d(300));
    }
}
