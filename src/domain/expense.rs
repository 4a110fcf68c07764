use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub is_deductible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Expense {
    pub fn new(user_id: Uuid, amount: Decimal, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            currency: default_currency(),
            merchant: None,
            category_id: None,
            date,
            description: None,
            notes: None,
            receipt_url: None,
            is_deductible: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deductible(mut self, is_deductible: bool) -> Self {
        self.is_deductible = is_deductible;
        self
    }

    /// Applies a partial update and bumps `updated_at`.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(merchant) = patch.merchant {
            self.merchant = merchant;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(receipt_url) = patch.receipt_url {
            self.receipt_url = receipt_url;
        }
        if let Some(is_deductible) = patch.is_deductible {
            self.is_deductible = is_deductible;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for an expense. Nested options distinguish "leave as is"
/// (`None`, or an absent JSON key) from "clear the field" (`Some(None)`, or
/// an explicit JSON `null`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub merchant: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub receipt_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deductible: Option<bool>,
}

/// Maps a present key to `Some`, so a JSON `null` becomes `Some(None)`.
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ExpensePatch {
    pub fn has_effect(&self) -> bool {
        self.amount.is_some()
            || self.currency.is_some()
            || self.merchant.is_some()
            || self.category_id.is_some()
            || self.date.is_some()
            || self.description.is_some()
            || self.notes.is_some()
            || self.receipt_url.is_some()
            || self.is_deductible.is_some()
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for Expense {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl BelongsToCategory for Expense {
    fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        let label = self
            .merchant
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("Expense");
        format!("{} {} {} ({})", self.date, label, self.amount, self.currency)
    }
}
