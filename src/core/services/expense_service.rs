use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::FinanceError;
use crate::domain::{
    expense::{Expense, ExpensePatch},
    ledger::{DateWindow, Ledger},
};

use super::{ServiceError, ServiceResult};

pub struct ExpenseService;

impl ExpenseService {
    pub fn add(ledger: &mut Ledger, expense: Expense) -> ServiceResult<Uuid> {
        Self::validate_amount(expense.amount)?;
        Self::validate_currency(&expense.currency)?;
        let id = ledger.add_expense(expense);
        tracing::info!(%id, "added expense");
        Ok(id)
    }

    /// Applies a partial update. An empty patch is a no-op.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: ExpensePatch) -> ServiceResult<()> {
        if !patch.has_effect() {
            return Ok(());
        }
        if let Some(amount) = patch.amount {
            Self::validate_amount(amount)?;
        }
        if let Some(currency) = &patch.currency {
            Self::validate_currency(currency)?;
        }
        let expense = ledger
            .expense_mut(id)
            .ok_or(FinanceError::ExpenseNotFound(id))?;
        expense.apply(patch);
        ledger.touch();
        tracing::info!(%id, "updated expense");
        Ok(())
    }

    /// Flips the deductible flag and returns its new value.
    pub fn toggle_deductible(ledger: &mut Ledger, id: Uuid) -> ServiceResult<bool> {
        let expense = ledger
            .expense_mut(id)
            .ok_or(FinanceError::ExpenseNotFound(id))?;
        expense.is_deductible = !expense.is_deductible;
        expense.updated_at = Utc::now();
        let value = expense.is_deductible;
        ledger.touch();
        tracing::debug!(%id, deductible = value, "toggled deductible flag");
        Ok(value)
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Expense> {
        let position = ledger
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(FinanceError::ExpenseNotFound(id))?;
        let removed = ledger.expenses.remove(position);
        ledger.touch();
        tracing::info!(%id, "removed expense");
        Ok(removed)
    }

    /// Expenses inside `window`, newest first.
    pub fn list_in_window<'a>(ledger: &'a Ledger, window: &DateWindow) -> Vec<&'a Expense> {
        let mut expenses: Vec<&Expense> = ledger
            .expenses
            .iter()
            .filter(|expense| window.contains(expense.date))
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    fn validate_amount(amount: Decimal) -> ServiceResult<()> {
        if amount.is_sign_negative() && !amount.is_zero() {
            Err(ServiceError::Invalid(
                "Expense amount cannot be negative".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn validate_currency(currency: &str) -> ServiceResult<()> {
        if currency.trim().is_empty() {
            Err(ServiceError::Invalid("Currency code is required".into()))
        } else {
            Ok(())
        }
    }
}
