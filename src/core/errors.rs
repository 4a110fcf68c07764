use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for core/domain/storage layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Ledger not loaded")]
    LedgerNotLoaded,
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, FinanceError>;

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error(transparent)]
    Service(#[from] crate::core::services::ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}
