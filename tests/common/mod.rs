#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{Duration, NaiveDate};
use freelance_core::{
    config::ConfigManager,
    core::ledger_manager::LedgerManager,
    domain::{
        expense::Expense,
        invoice::{Invoice, InvoiceStatus, LineItem},
        ledger::Ledger,
    },
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (LedgerManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage =
        JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    let ledger_manager = LedgerManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (ledger_manager, config_manager, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn dollars(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

pub fn empty_ledger() -> Ledger {
    Ledger::new("Test", Uuid::new_v4())
}

/// Single-line invoice issued on `issued`; paid ones are paid the same day.
pub fn invoice(user: Uuid, issued: NaiveDate, amount: i64, status: InvoiceStatus) -> Invoice {
    let mut invoice = Invoice::new(user, "", "Client", issued, issued + Duration::days(30))
        .with_line_items(vec![LineItem::new("Work", 1, dollars(amount))], Decimal::ZERO)
        .with_status(status);
    if status == InvoiceStatus::Paid {
        invoice.paid_date = Some(issued);
    }
    invoice
}

pub fn expense(user: Uuid, on: NaiveDate, amount: i64) -> Expense {
    Expense::new(user, dollars(amount), on)
}
