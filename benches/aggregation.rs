use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use freelance_core::{
    analytics::{aggregator::group_and_sum_by_category, DashboardStats, TaxPolicy},
    core::services::DashboardService,
    domain::{
        expense::Expense,
        invoice::{Invoice, InvoiceStatus, LineItem},
        ledger::{DateWindow, Ledger},
    },
    seed::default_categories,
    storage::json_backend::{load_ledger_from_path, save_ledger_to_path},
};
use rust_decimal::Decimal;
use tempfile::tempdir;
use uuid::Uuid;

fn build_sample_ledger(record_count: usize) -> Ledger {
    let user = Uuid::new_v4();
    let mut ledger = Ledger::new("Benchmark", user);
    ledger.categories = default_categories(user);
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for idx in 0..record_count {
        let on = start_date + Duration::days((idx % 365) as i64);
        let mut expense = Expense::new(user, Decimal::new(5_000 + (idx % 100) as i64, 2), on)
            .deductible(idx % 2 == 0);
        if idx % 5 != 0 {
            expense.category_id = Some(ledger.categories[idx % ledger.categories.len()].id);
        }
        ledger.expenses.push(expense);

        let status = InvoiceStatus::ALL[idx % InvoiceStatus::ALL.len()];
        let invoice = Invoice::new(user, format!("INV-{:05}", idx), "Client", on, on + Duration::days(30))
            .with_line_items(
                vec![LineItem::new("Work", 1 + (idx % 8) as u32, Decimal::new(95, 0))],
                Decimal::ZERO,
            )
            .with_status(status);
        ledger.invoices.push(invoice);
    }
    ledger
}

fn bench_aggregation(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("dashboard_stats_10k", |b| {
        b.iter(|| {
            let stats = DashboardStats::compute(&ledger, reference, &TaxPolicy::default());
            black_box(stats);
        })
    });

    c.bench_function("category_breakdown_10k", |b| {
        b.iter(|| {
            let rows = group_and_sum_by_category(&ledger.expenses, &ledger.categories);
            black_box(rows);
        })
    });

    let quarter = DateWindow::months_ending(reference, 3);
    c.bench_function("category_trend_quarter_10k", |b| {
        b.iter(|| {
            let rows = DashboardService::category_breakdown(&ledger, &quarter);
            black_box(rows);
        })
    });

    c.bench_function("monthly_series_12_10k", |b| {
        b.iter(|| {
            let series = DashboardService::monthly_series(&ledger, reference, 12);
            black_box(series);
        })
    });
}

fn bench_ledger_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("ledger.json");

    c.bench_function("ledger_save_10k", |b| {
        b.iter(|| {
            save_ledger_to_path(&ledger, &file_path).expect("save ledger");
        })
    });

    save_ledger_to_path(&ledger, &file_path).expect("seed");

    c.bench_function("ledger_load_10k", |b| {
        b.iter(|| {
            let loaded = load_ledger_from_path(&file_path).expect("load ledger");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_aggregation, bench_ledger_io);
criterion_main!(benches);
