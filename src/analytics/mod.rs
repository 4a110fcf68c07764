//! Pure computations that turn the record store into dashboard figures.
//!
//! Nothing in here performs I/O or returns errors: empty input yields zero,
//! ratios over a zero denominator yield zero, and arithmetic saturates
//! instead of overflowing.

pub mod aggregator;
pub mod dashboard;
pub mod insight;
pub mod tax;
pub mod trend;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

pub use aggregator::{
    category_breakdown_with_trend, group_and_sum_by_category, monthly_series, sum_by_type,
    CategoryTotal, MonthlyPoint,
};
pub use dashboard::DashboardStats;
pub use insight::{health_score, insights, HealthInputs, Insight, InsightContext, Insights};
pub use tax::{self_employment_style_tax, simple_tax, TaxBreakdown, TaxPolicy};
pub use trend::{percent_change, TrendDirection};

/// Converts a binary float from an untyped source into a money value.
/// Non-finite or unrepresentable input reads as zero.
pub fn sanitize_amount(value: f64) -> Decimal {
    if !value.is_finite() {
        tracing::debug!(value, "non-finite amount treated as zero");
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}
