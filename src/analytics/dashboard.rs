use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    aggregator::{deductible_total, expense_total, income_total},
    ratio_or_zero,
    tax::{TaxBreakdown, TaxPolicy},
    trend::percent_change,
};
use crate::domain::{
    invoice::{Invoice, InvoiceStatus},
    ledger::{DateWindow, Ledger},
};

/// Headline figures for the current calendar month against the one before.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub reference: NaiveDate,
    pub period: DateWindow,
    pub income: Decimal,
    pub expenses: Decimal,
    /// Profit for the period; positive means cash came in net.
    pub balance: Decimal,
    pub profit_margin: Decimal,
    pub income_change: Decimal,
    pub expense_change: Decimal,
    pub profit_change: Decimal,
    pub pending_invoices: usize,
    pub pending_amount: Decimal,
    pub overdue_invoices: usize,
    pub overdue_amount: Decimal,
    pub deductible_expenses: Decimal,
    pub estimated_tax: TaxBreakdown,
    pub estimated_deduction_savings: Decimal,
}

impl DashboardStats {
    pub fn compute(ledger: &Ledger, reference: NaiveDate, policy: &TaxPolicy) -> Self {
        let period = DateWindow::month_of(reference);
        let previous = period.preceding();

        let income = income_total(ledger, &period);
        let expenses = expense_total(ledger, &period);
        let balance = income.saturating_sub(expenses);

        let prev_income = income_total(ledger, &previous);
        let prev_expenses = expense_total(ledger, &previous);
        let prev_balance = prev_income.saturating_sub(prev_expenses);

        let (pending_invoices, pending_amount) =
            receivables(&ledger.invoices, reference, ReceivableState::Pending);
        let (overdue_invoices, overdue_amount) =
            receivables(&ledger.invoices, reference, ReceivableState::Overdue);

        let deductible_expenses = deductible_total(ledger, &period);

        tracing::debug!(
            %reference,
            %income,
            %expenses,
            invoices = ledger.invoices.len(),
            expenses_count = ledger.expenses.len(),
            "computed dashboard stats"
        );

        Self {
            reference,
            period,
            income,
            expenses,
            balance,
            profit_margin: ratio_or_zero(balance, income).saturating_mul(Decimal::ONE_HUNDRED),
            income_change: percent_change(income, prev_income),
            expense_change: percent_change(expenses, prev_expenses),
            profit_change: percent_change(balance, prev_balance),
            pending_invoices,
            pending_amount,
            overdue_invoices,
            overdue_amount,
            deductible_expenses,
            estimated_tax: policy.breakdown(income, expenses),
            estimated_deduction_savings: policy.deduction_savings(deductible_expenses),
        }
    }

    /// Expenses as a fraction of income, zero when there is no income.
    pub fn expense_ratio(&self) -> Decimal {
        ratio_or_zero(self.expenses, self.income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceivableState {
    Pending,
    Overdue,
}

/// An invoice is overdue when flagged so, or when it was sent and its due
/// date has passed; otherwise a sent invoice is pending.
fn receivable_state(invoice: &Invoice, today: NaiveDate) -> Option<ReceivableState> {
    match invoice.status {
        InvoiceStatus::Overdue => Some(ReceivableState::Overdue),
        InvoiceStatus::Sent if invoice.is_past_due(today) => Some(ReceivableState::Overdue),
        InvoiceStatus::Sent => Some(ReceivableState::Pending),
        InvoiceStatus::Draft | InvoiceStatus::Paid | InvoiceStatus::Cancelled => None,
    }
}

fn receivables(invoices: &[Invoice], today: NaiveDate, state: ReceivableState) -> (usize, Decimal) {
    invoices
        .iter()
        .filter(|invoice| receivable_state(invoice, today) == Some(state))
        .fold((0, Decimal::ZERO), |(count, total), invoice| {
            (count + 1, total.saturating_add(invoice.total))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{expense::Expense, invoice::LineItem};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn d(units: i64) -> Decimal {
        Decimal::new(units, 0)
    }

    fn invoice(user: Uuid, issued: NaiveDate, due: NaiveDate, amount: i64, status: InvoiceStatus) -> Invoice {
        Invoice::new(user, "INV", "Client", issued, due)
            .with_line_items(vec![LineItem::new("Work", 1, d(amount))], Decimal::ZERO)
            .with_status(status)
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let ledger = Ledger::new("Empty", Uuid::new_v4());
        let stats = DashboardStats::compute(&ledger, date(2024, 6, 15), &TaxPolicy::default());
        assert_eq!(stats.income, Decimal::ZERO);
        assert_eq!(stats.profit_margin, Decimal::ZERO);
        assert_eq!(stats.profit_change, Decimal::ZERO);
        assert_eq!(stats.estimated_tax.total, Decimal::ZERO);
        assert_eq!(stats.expense_ratio(), Decimal::ZERO);
    }

    #[test]
    fn compares_against_previous_month() {
        let user = Uuid::new_v4();
        let mut ledger = Ledger::new("Studio", user);
        ledger.add_invoice(invoice(user, date(2024, 5, 3), date(2024, 6, 3), 1000, InvoiceStatus::Paid));
        ledger.add_invoice(invoice(user, date(2024, 6, 3), date(2024, 7, 3), 2000, InvoiceStatus::Paid));
        ledger.add_expense(Expense::new(user, d(500), date(2024, 5, 10)));
        ledger.add_expense(Expense::new(user, d(500), date(2024, 6, 10)).deductible(true));

        let stats = DashboardStats::compute(&ledger, date(2024, 6, 20), &TaxPolicy::default());
        assert_eq!(stats.income, d(2000));
        assert_eq!(stats.balance, d(1500));
        assert_eq!(stats.profit_margin, d(75));
        assert_eq!(stats.income_change, d(100));
        assert_eq!(stats.expense_change, Decimal::ZERO);
        assert_eq!(stats.profit_change, d(200));
        assert_eq!(stats.deductible_expenses, d(500));
        assert_eq!(stats.estimated_tax.profit, d(1500));
    }

    #[test]
    fn classifies_receivables() {
        let user = Uuid::new_v4();
        let mut ledger = Ledger::new("Receivables", user);
        ledger.add_invoice(invoice(user, date(2024, 6, 1), date(2024, 6, 30), 300, InvoiceStatus::Sent));
        ledger.add_invoice(invoice(user, date(2024, 5, 1), date(2024, 5, 31), 200, InvoiceStatus::Sent));
        ledger.add_invoice(invoice(user, date(2024, 4, 1), date(2024, 4, 30), 100, InvoiceStatus::Overdue));
        ledger.add_invoice(invoice(user, date(2024, 6, 1), date(2024, 6, 30), 900, InvoiceStatus::Draft));

        let stats = DashboardStats::compute(&ledger, date(2024, 6, 10), &TaxPolicy::default());
        assert_eq!((stats.pending_invoices, stats.pending_amount), (1, d(300)));
        assert_eq!((stats.overdue_invoices, stats.overdue_amount), (2, d(300)));
    }
}
