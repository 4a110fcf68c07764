use chrono::NaiveDate;

use crate::analytics::{
    aggregator::{category_breakdown_with_trend, monthly_series, CategoryTotal, MonthlyPoint},
    dashboard::DashboardStats,
    insight::{health_score, insights, HealthInputs, Insight, InsightContext, InsightThresholds},
    tax::TaxPolicy,
};
use crate::currency::CurrencyCode;
use crate::domain::ledger::{DateWindow, Ledger};

/// Read-only views the dashboard renders.
pub struct DashboardService;

impl DashboardService {
    pub fn stats(ledger: &Ledger, reference: NaiveDate, policy: &TaxPolicy) -> DashboardStats {
        DashboardStats::compute(ledger, reference, policy)
    }

    pub fn health(stats: &DashboardStats) -> u8 {
        health_score(&HealthInputs::from(stats))
    }

    /// Insights for `stats`, in rule order. The breakdown should cover the
    /// same period as the stats.
    pub fn insights(
        stats: &DashboardStats,
        breakdown: &[CategoryTotal],
        thresholds: &InsightThresholds,
        currency: &CurrencyCode,
    ) -> Vec<Insight> {
        insights(InsightContext {
            stats,
            breakdown,
            thresholds,
            currency,
        })
        .collect()
    }

    /// Expense breakdown for `window`, with each bucket's change against the
    /// window of the same length immediately before it.
    pub fn category_breakdown(ledger: &Ledger, window: &DateWindow) -> Vec<CategoryTotal> {
        let previous = window.preceding();
        category_breakdown_with_trend(
            ledger.expenses.iter().filter(|e| window.contains(e.date)),
            ledger.expenses.iter().filter(|e| previous.contains(e.date)),
            &ledger.categories,
        )
    }

    pub fn monthly_series(ledger: &Ledger, reference: NaiveDate, months: u32) -> Vec<MonthlyPoint> {
        monthly_series(ledger, reference, months)
    }
}
