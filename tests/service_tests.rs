mod common;

use common::{date, dollars, empty_ledger, expense, invoice};
use freelance_core::{
    analytics::{insight::InsightThresholds, insight::InsightTone, TaxPolicy},
    core::services::{
        CategoryService, DashboardService, ExpenseService, InvoiceService, ServiceError,
    },
    currency::CurrencyCode,
    domain::{
        category::{Category, UNCATEGORIZED_LABEL},
        expense::ExpensePatch,
        invoice::{InvoiceStatus, LineItem},
        ledger::DateWindow,
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn recording_a_month_of_work_feeds_the_dashboard() {
    let mut ledger = empty_ledger();
    let user = ledger.user_id;
    let software =
        CategoryService::add(&mut ledger, Category::new(user, "Software", "#3B82F6", "laptop"))
            .expect("add category");

    let draft = invoice(user, date(2024, 6, 2), 0, InvoiceStatus::Draft);
    let invoice_id = InvoiceService::create(&mut ledger, draft, Decimal::ZERO).expect("create");
    InvoiceService::update_line_items(
        &mut ledger,
        invoice_id,
        vec![LineItem::new("Development", 20, dollars(100))],
        Decimal::ZERO,
    )
    .expect("line items");
    InvoiceService::mark_paid(&mut ledger, invoice_id, date(2024, 6, 12)).expect("paid");

    let expense_id = ExpenseService::add(
        &mut ledger,
        expense(user, date(2024, 6, 5), 500).with_category(software),
    )
    .expect("add expense");
    ExpenseService::toggle_deductible(&mut ledger, expense_id).expect("toggle");

    let stats = DashboardService::stats(&ledger, date(2024, 6, 20), &TaxPolicy::default());
    assert_eq!(stats.income, dollars(2000));
    assert_eq!(stats.expenses, dollars(500));
    assert_eq!(stats.deductible_expenses, dollars(500));
    assert_eq!(stats.profit_margin, dollars(75));

    let breakdown = DashboardService::category_breakdown(&ledger, &stats.period);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].name, "Software");
    assert_eq!(breakdown[0].percentage, Decimal::ONE_HUNDRED);

    let insights = DashboardService::insights(
        &stats,
        &breakdown,
        &InsightThresholds::default(),
        &CurrencyCode::default(),
    );
    assert_eq!(insights[0].tone, InsightTone::Positive);
    assert_eq!(DashboardService::health(&stats), 95);
}

#[test]
fn moving_an_expense_out_of_the_month_updates_totals() {
    let mut ledger = empty_ledger();
    let user = ledger.user_id;
    let id = ExpenseService::add(&mut ledger, expense(user, date(2024, 6, 5), 120)).unwrap();
    let june = DateWindow::month_of(date(2024, 6, 1));
    assert_eq!(ExpenseService::list_in_window(&ledger, &june).len(), 1);

    ExpenseService::update(
        &mut ledger,
        id,
        ExpensePatch {
            date: Some(date(2024, 5, 28)),
            ..ExpensePatch::default()
        },
    )
    .unwrap();
    assert!(ExpenseService::list_in_window(&ledger, &june).is_empty());
    let stats = DashboardService::stats(&ledger, date(2024, 6, 10), &TaxPolicy::default());
    assert_eq!(stats.expenses, Decimal::ZERO);
    assert_eq!(stats.expense_change, dollars(-100));
}

#[test]
fn dangling_category_reads_as_uncategorized() {
    let mut ledger = empty_ledger();
    let user = ledger.user_id;
    ExpenseService::add(
        &mut ledger,
        expense(user, date(2024, 6, 5), 80).with_category(Uuid::new_v4()),
    )
    .unwrap();
    ExpenseService::add(&mut ledger, expense(user, date(2024, 6, 6), 20)).unwrap();

    let breakdown =
        DashboardService::category_breakdown(&ledger, &DateWindow::month_of(date(2024, 6, 1)));
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].name, UNCATEGORIZED_LABEL);
    assert_eq!(breakdown[0].amount, dollars(100));
}

#[test]
fn overdue_refresh_moves_receivables() {
    let mut ledger = empty_ledger();
    let user = ledger.user_id;
    let sent = invoice(user, date(2024, 5, 1), 300, InvoiceStatus::Sent);
    let id = InvoiceService::create(&mut ledger, sent, Decimal::ZERO).unwrap();

    let before = DashboardService::stats(&ledger, date(2024, 5, 20), &TaxPolicy::default());
    assert_eq!((before.pending_invoices, before.overdue_invoices), (1, 0));

    assert_eq!(InvoiceService::refresh_overdue(&mut ledger, date(2024, 6, 15)), 1);
    assert_eq!(ledger.invoice(id).unwrap().status, InvoiceStatus::Overdue);
    let after = DashboardService::stats(&ledger, date(2024, 6, 15), &TaxPolicy::default());
    assert_eq!((after.pending_invoices, after.overdue_invoices), (0, 1));
    assert_eq!(after.overdue_amount, dollars(300));
}

#[test]
fn invalid_operations_surface_service_errors() {
    let mut ledger = empty_ledger();
    let missing = Uuid::new_v4();
    assert!(matches!(
        ExpenseService::toggle_deductible(&mut ledger, missing),
        Err(ServiceError::Core(_))
    ));
    assert!(matches!(
        InvoiceService::mark_paid(&mut ledger, missing, date(2024, 1, 1)),
        Err(ServiceError::Core(_))
    ));
    assert!(CategoryService::resolve_name(&ledger, "Anything").is_err());
}
