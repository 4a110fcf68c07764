pub mod category_service;
pub mod dashboard_service;
pub mod expense_service;
pub mod invoice_service;

pub use category_service::CategoryService;
pub use dashboard_service::DashboardService;
pub use expense_service::ExpenseService;
pub use invoice_service::InvoiceService;

use crate::core::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error("{0}")]
    Invalid(String),
}
