//! Health score and rule-based observations derived from dashboard figures.
//!
//! Both are deterministic: the same figures always produce the same score and
//! the same insights in the same order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{aggregator::CategoryTotal, dashboard::DashboardStats};
use crate::currency::{format_currency, format_percent, CurrencyCode};

const BASE_SCORE: i32 = 50;
const POSITIVE_BALANCE_BONUS: i32 = 20;
const HEALTHY_MARGIN_BONUS: i32 = 15;
const STRONG_MARGIN_BONUS: i32 = 10;
const PROFIT_GROWTH_BONUS: i32 = 15;
const HEALTHY_MARGIN_PERCENT: i64 = 20;
const STRONG_MARGIN_PERCENT: i64 = 30;

/// The figures the health score looks at.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthInputs {
    pub balance: Decimal,
    pub profit_margin: Decimal,
    pub profit_change: Decimal,
}

impl From<&DashboardStats> for HealthInputs {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            balance: stats.balance,
            profit_margin: stats.profit_margin,
            profit_change: stats.profit_change,
        }
    }
}

/// Heuristic 0 to 100 score: a base of 50 plus fixed bonuses, clamped.
pub fn health_score(inputs: &HealthInputs) -> u8 {
    let mut score = BASE_SCORE;
    if inputs.balance > Decimal::ZERO {
        score += POSITIVE_BALANCE_BONUS;
    }
    if inputs.profit_margin > Decimal::from(HEALTHY_MARGIN_PERCENT) {
        score += HEALTHY_MARGIN_BONUS;
    }
    if inputs.profit_margin > Decimal::from(STRONG_MARGIN_PERCENT) {
        score += STRONG_MARGIN_BONUS;
    }
    if inputs.profit_change > Decimal::ZERO {
        score += PROFIT_GROWTH_BONUS;
    }
    score.clamp(0, 100) as u8
}

/// Tunable thresholds for the insight rules. Ratios are fractions of income,
/// shares are percentages of total spending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightThresholds {
    pub high_expense_ratio: Decimal,
    pub elevated_expense_ratio: Decimal,
    pub dominant_category_share: Decimal,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_expense_ratio: Decimal::new(70, 2),
            elevated_expense_ratio: Decimal::new(50, 2),
            dominant_category_share: Decimal::new(40, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightTone {
    Positive,
    Neutral,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub tone: InsightTone,
    pub headline: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Insight {
    fn new(tone: InsightTone, headline: &str, description: String) -> Self {
        Self {
            tone,
            headline: headline.to_string(),
            description,
            action: None,
        }
    }

    fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }
}

/// Everything the rules read. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub stats: &'a DashboardStats,
    pub breakdown: &'a [CategoryTotal],
    pub thresholds: &'a InsightThresholds,
    pub currency: &'a CurrencyCode,
}

type Rule = fn(&InsightContext<'_>) -> Option<Insight>;

const RULES: &[Rule] = &[
    cash_position,
    profit_margin,
    income_trend,
    expense_ratio,
    overdue_invoices,
    outstanding_receivables,
    deductions_tracked,
    dominant_category,
];

/// Lazily evaluates the rule table. Clone the iterator, or call [`insights`]
/// again, to restart from the first rule.
#[derive(Debug, Clone)]
pub struct Insights<'a> {
    context: InsightContext<'a>,
    next_rule: usize,
}

impl<'a> Iterator for Insights<'a> {
    type Item = Insight;

    fn next(&mut self) -> Option<Insight> {
        while let Some(rule) = RULES.get(self.next_rule) {
            self.next_rule += 1;
            if let Some(insight) = rule(&self.context) {
                return Some(insight);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(RULES.len().saturating_sub(self.next_rule)))
    }
}

pub fn insights(context: InsightContext<'_>) -> Insights<'_> {
    Insights {
        context,
        next_rule: 0,
    }
}

fn money(ctx: &InsightContext<'_>, amount: Decimal) -> String {
    format_currency(amount, ctx.currency)
}

fn cash_position(ctx: &InsightContext<'_>) -> Option<Insight> {
    let balance = ctx.stats.balance;
    if balance > Decimal::ZERO {
        Some(Insight::new(
            InsightTone::Positive,
            "Strong cash position",
            format!("You kept {} after expenses this month.", money(ctx, balance)),
        ))
    } else if balance < Decimal::ZERO {
        Some(
            Insight::new(
                InsightTone::Warning,
                "Spending exceeds income",
                format!(
                    "Expenses outpaced income by {} this month.",
                    money(ctx, -balance)
                ),
            )
            .with_action("Review expenses"),
        )
    } else {
        None
    }
}

fn profit_margin(ctx: &InsightContext<'_>) -> Option<Insight> {
    let stats = ctx.stats;
    if stats.income <= Decimal::ZERO {
        return None;
    }
    let margin = format_percent(stats.profit_margin);
    if stats.profit_margin > Decimal::from(STRONG_MARGIN_PERCENT) {
        Some(Insight::new(
            InsightTone::Positive,
            "Excellent profit margin",
            format!("Your {} margin is well above the 30% mark.", margin),
        ))
    } else if stats.profit_margin > Decimal::from(HEALTHY_MARGIN_PERCENT) {
        Some(Insight::new(
            InsightTone::Positive,
            "Healthy profit margin",
            format!("Your margin sits at {}.", margin),
        ))
    } else {
        Some(
            Insight::new(
                InsightTone::Warning,
                "Room to improve margins",
                format!("Your margin is {}; freelancers often aim for 20% or more.", margin),
            )
            .with_action("Review pricing"),
        )
    }
}

fn income_trend(ctx: &InsightContext<'_>) -> Option<Insight> {
    let change = ctx.stats.income_change;
    if change > Decimal::ZERO {
        Some(Insight::new(
            InsightTone::Positive,
            "Income is growing",
            format!("Income is up {} on last month.", format_percent(change)),
        ))
    } else if change < Decimal::ZERO {
        Some(
            Insight::new(
                InsightTone::Warning,
                "Income dipped",
                format!("Income is down {} on last month.", format_percent(-change)),
            )
            .with_action("Follow up with clients"),
        )
    } else {
        None
    }
}

fn expense_ratio(ctx: &InsightContext<'_>) -> Option<Insight> {
    if ctx.stats.income <= Decimal::ZERO {
        return None;
    }
    let ratio = ctx.stats.expense_ratio();
    let share = format_percent(ratio.saturating_mul(Decimal::ONE_HUNDRED));
    if ratio >= ctx.thresholds.high_expense_ratio {
        Some(
            Insight::new(
                InsightTone::Warning,
                "Expenses consuming most income",
                format!("Expenses took {} of this month's income.", share),
            )
            .with_action("Review expenses"),
        )
    } else if ratio >= ctx.thresholds.elevated_expense_ratio {
        Some(Insight::new(
            InsightTone::Neutral,
            "Expenses trending high",
            format!("Expenses took {} of this month's income.", share),
        ))
    } else {
        None
    }
}

fn overdue_invoices(ctx: &InsightContext<'_>) -> Option<Insight> {
    let count = ctx.stats.overdue_invoices;
    if count == 0 {
        return None;
    }
    let noun = if count == 1 { "invoice is" } else { "invoices are" };
    Some(
        Insight::new(
            InsightTone::Warning,
            "Overdue invoices",
            format!(
                "{} {} overdue, totalling {}.",
                count,
                noun,
                money(ctx, ctx.stats.overdue_amount)
            ),
        )
        .with_action("Send reminders"),
    )
}

fn outstanding_receivables(ctx: &InsightContext<'_>) -> Option<Insight> {
    let count = ctx.stats.pending_invoices;
    if count == 0 {
        return None;
    }
    Some(Insight::new(
        InsightTone::Neutral,
        "Payments on the way",
        format!(
            "{} awaiting payment across {} sent invoice{}.",
            money(ctx, ctx.stats.pending_amount),
            count,
            if count == 1 { "" } else { "s" }
        ),
    ))
}

fn deductions_tracked(ctx: &InsightContext<'_>) -> Option<Insight> {
    let deductible = ctx.stats.deductible_expenses;
    if deductible <= Decimal::ZERO {
        return None;
    }
    Some(Insight::new(
        InsightTone::Positive,
        "Deductions tracked",
        format!(
            "{} of deductible expenses could save about {} in tax.",
            money(ctx, deductible),
            money(ctx, ctx.stats.estimated_deduction_savings)
        ),
    ))
}

fn dominant_category(ctx: &InsightContext<'_>) -> Option<Insight> {
    let top = ctx.breakdown.first()?;
    if top.amount <= Decimal::ZERO || top.percentage < ctx.thresholds.dominant_category_share {
        return None;
    }
    Some(
        Insight::new(
            InsightTone::Neutral,
            "Spending concentrated",
            format!(
                "{} accounts for {} of spending.",
                top.name,
                format_percent(top.percentage)
            ),
        )
        .with_action("View category breakdown"),
    )
}
