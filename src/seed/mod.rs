//! Deterministic mock-data generators used to populate demo ledgers.
//!
//! Records are spread over the months leading up to a reference date by
//! cycling through fixed templates, so the same inputs always produce the same
//! amounts, dates, and statuses (ids and audit timestamps are fresh).

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::analytics::tax::DEFAULT_INVOICE_TAX_PERCENT;
use crate::domain::{
    category::Category,
    expense::Expense,
    invoice::{Invoice, InvoiceStatus, LineItem},
    ledger::{first_of_month, shift_month, Ledger},
};

const CATEGORY_TEMPLATES: &[(&str, &str, &str)] = &[
    ("Software", "#3B82F6", "laptop"),
    ("Office Supplies", "#10B981", "paperclip"),
    ("Travel", "#F59E0B", "plane"),
    ("Meals", "#EF4444", "utensils"),
    ("Marketing", "#8B5CF6", "megaphone"),
    ("Professional Services", "#EC4899", "briefcase"),
    ("Utilities", "#6366F1", "bolt"),
    ("Equipment", "#14B8A6", "camera"),
];

/// (merchant, description, amount in cents, category index, deductible)
const EXPENSE_TEMPLATES: &[(&str, &str, i64, usize, bool)] = &[
    ("Adobe", "Creative Cloud subscription", 5499, 0, true),
    ("Staples", "Printer paper and ink", 8723, 1, true),
    ("Delta Airlines", "Client site visit", 42860, 2, true),
    ("Blue Bottle Coffee", "Client meeting", 2450, 3, false),
    ("Google Ads", "Search campaign", 15000, 4, true),
    ("Bench Accounting", "Monthly bookkeeping", 19900, 5, true),
    ("Comcast", "Business internet", 8999, 6, true),
    ("B&H Photo", "External SSD", 12999, 7, true),
    ("GitHub", "Team plan", 2100, 0, true),
    ("Chipotle", "Lunch", 1375, 3, false),
];

/// (client, email, description, hours, hourly rate)
const INVOICE_TEMPLATES: &[(&str, &str, &str, u32, i64)] = &[
    ("Acme Corp", "billing@acme.test", "Website redesign", 24, 95),
    ("Globex", "ap@globex.test", "Brand strategy workshop", 8, 150),
    ("Initech", "finance@initech.test", "API integration", 32, 110),
    ("Umbrella Health", "accounts@umbrella.test", "UX audit", 12, 125),
    ("Stark Studio", "pay@stark.test", "Product photography", 6, 180),
];

const INVOICE_STATUS_CYCLE: &[InvoiceStatus] = &[
    InvoiceStatus::Paid,
    InvoiceStatus::Paid,
    InvoiceStatus::Sent,
    InvoiceStatus::Paid,
    InvoiceStatus::Draft,
    InvoiceStatus::Overdue,
];

const PAYMENT_TERMS_DAYS: i64 = 30;
const RECORDS_PER_MONTH: usize = 4;

pub const DEFAULT_EXPENSE_COUNT: usize = 24;
pub const DEFAULT_INVOICE_COUNT: usize = 12;

/// The static category seed set.
pub fn default_categories(user_id: Uuid) -> Vec<Category> {
    CATEGORY_TEMPLATES
        .iter()
        .map(|(name, color, icon)| Category::new(user_id, *name, *color, *icon).as_default())
        .collect()
}

/// Day within a month for the `index`-th record; stays within 1..=28.
fn day_offset(index: usize) -> i64 {
    ((index * 7) % 28) as i64
}

/// Month start `index / per_month` months before `reference`'s month.
fn month_for(reference: NaiveDate, index: usize, per_month: usize) -> NaiveDate {
    let back = (index / per_month.max(1)) as i32;
    shift_month(first_of_month(reference), -back)
}

/// Generates `count` expenses, newest months first, never dated after
/// `reference`. Category ids refer into `categories` when it is non-empty.
pub fn mock_expenses(
    user_id: Uuid,
    categories: &[Category],
    reference: NaiveDate,
    count: usize,
) -> Vec<Expense> {
    (0..count)
        .map(|index| {
            let (merchant, description, cents, category_idx, deductible) =
                EXPENSE_TEMPLATES[index % EXPENSE_TEMPLATES.len()];
            let date = (month_for(reference, index, RECORDS_PER_MONTH)
                + Duration::days(day_offset(index)))
            .min(reference);
            let mut expense = Expense::new(user_id, Decimal::new(cents, 2), date)
                .with_merchant(merchant)
                .with_description(description)
                .deductible(deductible);
            if let Some(category) = categories.get(category_idx % categories.len().max(1)) {
                expense.category_id = Some(category.id);
            }
            expense
        })
        .collect()
}

/// Generates `count` invoices numbered `INV-0001` upwards, cycling through
/// paid, sent, draft, and overdue states.
pub fn mock_invoices(user_id: Uuid, reference: NaiveDate, count: usize) -> Vec<Invoice> {
    (0..count)
        .map(|index| {
            let (client, email, description, hours, rate) =
                INVOICE_TEMPLATES[index % INVOICE_TEMPLATES.len()];
            let status = INVOICE_STATUS_CYCLE[index % INVOICE_STATUS_CYCLE.len()];
            let issue_date = (month_for(reference, index, 2) + Duration::days(day_offset(index)))
                .min(reference);
            let due_date = issue_date + Duration::days(PAYMENT_TERMS_DAYS);
            let mut invoice = Invoice::new(
                user_id,
                format!("INV-{:04}", index + 1),
                client,
                issue_date,
                due_date,
            )
            .with_line_items(
                vec![LineItem::new(description, hours, Decimal::new(rate, 0))],
                DEFAULT_INVOICE_TAX_PERCENT,
            )
            .with_status(status);
            invoice.client_email = Some(email.to_string());
            if status == InvoiceStatus::Paid {
                invoice.paid_date = Some((issue_date + Duration::days(10)).min(reference));
            }
            invoice
        })
        .collect()
}

/// A ledger populated with the default categories and mock records.
pub fn demo_ledger(name: &str, reference: NaiveDate) -> Ledger {
    let user_id = Uuid::new_v4();
    let mut ledger = Ledger::new(name, user_id);
    ledger.categories = default_categories(user_id);
    ledger.expenses = mock_expenses(user_id, &ledger.categories, reference, DEFAULT_EXPENSE_COUNT);
    ledger.invoices = mock_invoices(user_id, reference, DEFAULT_INVOICE_COUNT);
    ledger.touch();
    tracing::info!(
        ledger = name,
        expenses = ledger.expenses.len(),
        invoices = ledger.invoices.len(),
        "seeded demo ledger"
    );
    ledger
}
