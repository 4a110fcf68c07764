pub mod category;
pub mod common;
pub mod expense;
pub mod invoice;
pub mod ledger;
pub mod transaction;

pub use category::{Category, UNCATEGORIZED_LABEL};
pub use common::{Amounted, BelongsToCategory, Dated, Displayable, Identifiable, NamedEntity};
pub use expense::{Expense, ExpensePatch};
pub use invoice::{Invoice, InvoiceStatus, LineItem};
pub use ledger::{DateWindow, Ledger};
pub use transaction::{Transaction, TransactionSource, TransactionType};
