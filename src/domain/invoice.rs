use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::tax::simple_tax;
use crate::currency::round_money;
use crate::domain::common::*;

/// Invoice lifecycle states. Any state may follow any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    /// Whether the invoice counts towards realised income.
    pub fn is_income(self) -> bool {
        match self {
            InvoiceStatus::Paid => true,
            InvoiceStatus::Draft
            | InvoiceStatus::Sent
            | InvoiceStatus::Overdue
            | InvoiceStatus::Cancelled => false,
        }
    }

    /// Whether money is still expected from the client.
    pub fn is_receivable(self) -> bool {
        match self {
            InvoiceStatus::Sent | InvoiceStatus::Overdue => true,
            InvoiceStatus::Draft | InvoiceStatus::Paid | InvoiceStatus::Cancelled => false,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// One billable row of an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: u32, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            amount: rate.saturating_mul(Decimal::from(quantity)),
        }
    }

    pub fn expected_amount(&self) -> Decimal {
        self.rate.saturating_mul(Decimal::from(self.quantity))
    }

    pub fn checked_amount(&self) -> Option<Decimal> {
        self.rate.checked_mul(Decimal::from(self.quantity))
    }
}

/// Subtotal, tax, and total for `line_items`, or `None` when any step
/// overflows the decimal range.
pub fn checked_totals(
    line_items: &[LineItem],
    tax_rate_percent: Decimal,
) -> Option<(Decimal, Decimal, Decimal)> {
    let subtotal = line_items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.checked_amount()?)
    })?;
    let tax = round_money(subtotal.checked_mul(tax_rate_percent)? / Decimal::ONE_HUNDRED);
    let total = subtotal.checked_add(tax)?;
    Some((subtotal, tax, total))
}

fn saturating_subtotal(line_items: &[LineItem]) -> Decimal {
    line_items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        user_id: Uuid,
        invoice_number: impl Into<String>,
        client_name: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            invoice_number: invoice_number.into(),
            status: InvoiceStatus::Draft,
            client_name: client_name.into(),
            client_email: None,
            client_address: None,
            issue_date,
            due_date,
            paid_date: None,
            line_items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_line_items(mut self, line_items: Vec<LineItem>, tax_rate_percent: Decimal) -> Self {
        self.line_items = line_items;
        self.recalculate(tax_rate_percent);
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Re-derives line amounts, subtotal, tax, and total from the line items.
    /// Amounts past the decimal range saturate.
    pub fn recalculate(&mut self, tax_rate_percent: Decimal) {
        for item in &mut self.line_items {
            item.amount = item.expected_amount();
        }
        self.subtotal = saturating_subtotal(&self.line_items);
        self.tax = round_money(simple_tax(self.subtotal, tax_rate_percent));
        self.total = self.subtotal.saturating_add(self.tax);
        self.updated_at = Utc::now();
    }

    /// Checks the stored totals against the line items without modifying them.
    pub fn totals_consistent(&self) -> bool {
        let items_ok = self
            .line_items
            .iter()
            .all(|item| item.amount == item.expected_amount());
        items_ok
            && saturating_subtotal(&self.line_items) == self.subtotal
            && self.subtotal.saturating_add(self.tax) == self.total
    }

    /// Date the invoice contributes income on.
    pub fn income_date(&self) -> NaiveDate {
        self.paid_date.unwrap_or(self.issue_date)
    }

    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Invoice {
    fn amount(&self) -> Decimal {
        self.total
    }
}

impl Dated for Invoice {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.income_date())
    }
}

impl Displayable for Invoice {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {}",
            self.invoice_number, self.client_name, self.status, self.total
        )
    }
}
