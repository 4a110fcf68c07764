use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::FinanceError;
use crate::domain::{
    invoice::{checked_totals, Invoice, InvoiceStatus, LineItem},
    ledger::Ledger,
};

use super::{ServiceError, ServiceResult};

const NUMBER_PREFIX: &str = "INV-";

pub struct InvoiceService;

impl InvoiceService {
    /// Stores `draft` with freshly computed totals. A blank number gets the
    /// next `INV-NNNN` in sequence; explicit numbers are taken as given.
    pub fn create(
        ledger: &mut Ledger,
        mut draft: Invoice,
        tax_rate_percent: Decimal,
    ) -> ServiceResult<Uuid> {
        Self::validate(&draft, tax_rate_percent)?;
        if draft.invoice_number.trim().is_empty() {
            draft.invoice_number = Self::next_invoice_number(ledger);
        }
        draft.recalculate(tax_rate_percent);
        let number = draft.invoice_number.clone();
        let id = ledger.add_invoice(draft);
        tracing::info!(%id, number = %number, "created invoice");
        Ok(id)
    }

    pub fn update_line_items(
        ledger: &mut Ledger,
        id: Uuid,
        line_items: Vec<LineItem>,
        tax_rate_percent: Decimal,
    ) -> ServiceResult<Decimal> {
        if tax_rate_percent.is_sign_negative() {
            return Err(ServiceError::Invalid("Tax rate cannot be negative".into()));
        }
        Self::validate_line_items(&line_items, tax_rate_percent)?;
        let invoice = Self::find_mut(ledger, id)?;
        invoice.line_items = line_items;
        invoice.recalculate(tax_rate_percent);
        let total = invoice.total;
        ledger.touch();
        tracing::info!(%id, %total, "updated invoice line items");
        Ok(total)
    }

    /// Any status may follow any other. Leaving PAID clears the paid date.
    pub fn set_status(ledger: &mut Ledger, id: Uuid, status: InvoiceStatus) -> ServiceResult<()> {
        let invoice = Self::find_mut(ledger, id)?;
        let previous = invoice.status;
        invoice.status = status;
        if status != InvoiceStatus::Paid {
            invoice.paid_date = None;
        }
        invoice.updated_at = Utc::now();
        ledger.touch();
        tracing::info!(%id, from = %previous, to = %status, "changed invoice status");
        Ok(())
    }

    pub fn mark_paid(ledger: &mut Ledger, id: Uuid, paid_on: NaiveDate) -> ServiceResult<()> {
        let invoice = Self::find_mut(ledger, id)?;
        invoice.status = InvoiceStatus::Paid;
        invoice.paid_date = Some(paid_on);
        invoice.updated_at = Utc::now();
        ledger.touch();
        tracing::info!(%id, %paid_on, "marked invoice paid");
        Ok(())
    }

    /// Flags sent invoices whose due date has passed. Returns how many changed.
    pub fn refresh_overdue(ledger: &mut Ledger, today: NaiveDate) -> usize {
        let now = Utc::now();
        let mut changed = 0;
        for invoice in ledger
            .invoices
            .iter_mut()
            .filter(|invoice| invoice.status == InvoiceStatus::Sent && invoice.is_past_due(today))
        {
            invoice.status = InvoiceStatus::Overdue;
            invoice.updated_at = now;
            changed += 1;
        }
        if changed > 0 {
            ledger.touch();
            tracing::info!(count = changed, %today, "flagged overdue invoices");
        }
        changed
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Invoice> {
        let position = ledger
            .invoices
            .iter()
            .position(|invoice| invoice.id == id)
            .ok_or(FinanceError::InvoiceNotFound(id))?;
        let removed = ledger.invoices.remove(position);
        ledger.touch();
        tracing::info!(%id, "removed invoice");
        Ok(removed)
    }

    /// One past the highest `INV-NNNN` number in the ledger.
    pub fn next_invoice_number(ledger: &Ledger) -> String {
        let highest = ledger
            .invoices
            .iter()
            .filter_map(|invoice| invoice.invoice_number.strip_prefix(NUMBER_PREFIX))
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{:04}", NUMBER_PREFIX, highest.saturating_add(1))
    }

    fn find_mut(ledger: &mut Ledger, id: Uuid) -> ServiceResult<&mut Invoice> {
        ledger
            .invoice_mut(id)
            .ok_or_else(|| FinanceError::InvoiceNotFound(id).into())
    }

    fn validate(draft: &Invoice, tax_rate_percent: Decimal) -> ServiceResult<()> {
        if draft.client_name.trim().is_empty() {
            return Err(ServiceError::Invalid("Client name is required".into()));
        }
        if draft.due_date < draft.issue_date {
            return Err(ServiceError::Invalid(
                "Due date cannot precede the issue date".into(),
            ));
        }
        if tax_rate_percent.is_sign_negative() {
            return Err(ServiceError::Invalid("Tax rate cannot be negative".into()));
        }
        Self::validate_line_items(&draft.line_items, tax_rate_percent)
    }

    fn validate_line_items(items: &[LineItem], tax_rate_percent: Decimal) -> ServiceResult<()> {
        if items
            .iter()
            .any(|item| item.rate.is_sign_negative() && !item.rate.is_zero())
        {
            return Err(ServiceError::Invalid("Line item rates cannot be negative".into()));
        }
        if checked_totals(items, tax_rate_percent).is_none() {
            return Err(ServiceError::Invalid("Invoice total is too large".into()));
        }
        Ok(())
    }
}
