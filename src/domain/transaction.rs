use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{common::*, expense::Expense, invoice::Invoice};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Record a transaction row was synthesized from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TransactionSource {
    Invoice(Uuid),
    Expense(Uuid),
}

/// Read-only unified row combining paid invoices and expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub source: TransactionSource,
}

impl Transaction {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            kind: TransactionType::Income,
            amount: invoice.total,
            date: invoice.income_date(),
            label: invoice.client_name.clone(),
            category_id: None,
            source: TransactionSource::Invoice(invoice.id),
        }
    }

    pub fn from_expense(expense: &Expense) -> Self {
        let label = expense
            .merchant
            .clone()
            .or_else(|| expense.description.clone())
            .unwrap_or_else(|| "Expense".to_string());
        Self {
            id: expense.id,
            kind: TransactionType::Expense,
            amount: expense.amount,
            date: expense.date,
            label,
            category_id: expense.category_id,
            source: TransactionSource::Expense(expense.id),
        }
    }

    /// Builds the unified view: one income row per paid invoice and one expense
    /// row per expense, newest first.
    pub fn unify(invoices: &[Invoice], expenses: &[Expense]) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = invoices
            .iter()
            .filter(|invoice| invoice.status.is_income())
            .map(Transaction::from_invoice)
            .chain(expenses.iter().map(Transaction::from_expense))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    /// Amount signed by direction: income positive, expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for Transaction {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl BelongsToCategory for Transaction {
    fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} {} {} {}", self.date, self.kind, self.label, self.amount)
    }
}
