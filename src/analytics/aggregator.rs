//! Sums, filters, and groupings over record collections.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{ratio_or_zero, trend::percent_change};
use crate::domain::{
    category::{Category, UNCATEGORIZED_COLOR, UNCATEGORIZED_LABEL},
    common::{Amounted, BelongsToCategory, Dated},
    ledger::{first_of_month, shift_month, DateWindow, Ledger},
};

/// Sums `amount` over records that satisfy `predicate` and fall inside
/// `window`. Records without a usable date never match.
pub fn sum_by_type<I, R, P>(records: I, predicate: P, window: &DateWindow) -> Decimal
where
    I: IntoIterator<Item = R>,
    R: Amounted + Dated,
    P: Fn(&R) -> bool,
{
    records
        .into_iter()
        .filter(|record| {
            record
                .record_date()
                .map_or(false, |date| window.contains(date))
        })
        .filter(|record| predicate(record))
        .fold(Decimal::ZERO, |acc, record| {
            acc.saturating_add(record.amount())
        })
}

/// Realised income (paid invoices) inside the window.
pub fn income_total(ledger: &Ledger, window: &DateWindow) -> Decimal {
    sum_by_type(&ledger.invoices, |invoice| invoice.status.is_income(), window)
}

/// Every expense inside the window, deductible or not.
pub fn expense_total(ledger: &Ledger, window: &DateWindow) -> Decimal {
    sum_by_type(&ledger.expenses, |_| true, window)
}

pub fn deductible_total(ledger: &Ledger, window: &DateWindow) -> Decimal {
    sum_by_type(&ledger.expenses, |expense| expense.is_deductible, window)
}

/// One category bucket of an expense breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Decimal>,
}

/// Groups expense amounts by category and computes each bucket's share of
/// the total. Expenses with no category, or a category id that no longer
/// exists, share the single uncategorized bucket. Output is sorted by amount,
/// descending, with ties kept in first-seen order.
pub fn group_and_sum_by_category<I, R>(expenses: I, categories: &[Category]) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = R>,
    R: Amounted + BelongsToCategory,
{
    let known: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let buckets = bucket_amounts(expenses, &known);
    let total = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(*amount));

    let mut rows: Vec<CategoryTotal> = buckets
        .into_iter()
        .map(|(key, amount)| {
            let category = key.and_then(|id| known.get(&id).copied());
            CategoryTotal {
                category_id: key,
                name: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                amount,
                percentage: ratio_or_zero(amount, total).saturating_mul(Decimal::ONE_HUNDRED),
                color: category
                    .map(|c| c.color.clone())
                    .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
                trend: None,
            }
        })
        .collect();
    // `sort_by` is stable, so equal amounts keep their first-seen order.
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));
    rows
}

/// Breakdown of `current` with each bucket's change against the same bucket
/// in `previous`.
pub fn category_breakdown_with_trend<I, J, R, S>(
    current: I,
    previous: J,
    categories: &[Category],
) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = R>,
    J: IntoIterator<Item = S>,
    R: Amounted + BelongsToCategory,
    S: Amounted + BelongsToCategory,
{
    let known: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let prior: HashMap<Option<Uuid>, Decimal> =
        bucket_amounts(previous, &known).into_iter().collect();
    let mut rows = group_and_sum_by_category(current, categories);
    for row in &mut rows {
        let before = prior.get(&row.category_id).copied().unwrap_or(Decimal::ZERO);
        row.trend = Some(percent_change(row.amount, before));
    }
    rows
}

/// Sums per bucket key, preserving the order in which keys first appear.
fn bucket_amounts<I, R>(expenses: I, known: &HashMap<Uuid, &Category>) -> Vec<(Option<Uuid>, Decimal)>
where
    I: IntoIterator<Item = R>,
    R: Amounted + BelongsToCategory,
{
    let mut order: Vec<(Option<Uuid>, Decimal)> = Vec::new();
    let mut index: HashMap<Option<Uuid>, usize> = HashMap::new();
    for expense in expenses {
        let key = expense.category_id().filter(|id| known.contains_key(id));
        let slot = *index.entry(key).or_insert_with(|| {
            order.push((key, Decimal::ZERO));
            order.len() - 1
        });
        order[slot].1 = order[slot].1.saturating_add(expense.amount());
    }
    order
}

/// Income, expenses, and profit for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month_start: NaiveDate,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

/// Chart series of `months` calendar months ending with the month that
/// contains `reference`, oldest first.
pub fn monthly_series(ledger: &Ledger, reference: NaiveDate, months: u32) -> Vec<MonthlyPoint> {
    let anchor = first_of_month(reference);
    (0..months.max(1) as i32)
        .rev()
        .map(|offset| {
            let month_start = shift_month(anchor, -offset);
            let window = DateWindow::month_of(month_start);
            let income = income_total(ledger, &window);
            let expenses = expense_total(ledger, &window);
            MonthlyPoint {
                month_start,
                label: month_start.format("%b %Y").to_string(),
                income,
                expenses,
                profit: income.saturating_sub(expenses),
            }
        })
        .collect()
}
