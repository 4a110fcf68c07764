use chrono::NaiveDate;

use crate::analytics::trend::TrendDirection;
use crate::config::{Config, ConfigManager};
use crate::core::{
    errors::CliError,
    ledger_manager::LedgerManager,
    services::{DashboardService, ExpenseService},
};
use crate::currency::{format_currency, format_percent, CurrencyCode};
use crate::domain::{
    invoice::InvoiceStatus,
    ledger::{DateWindow, Ledger},
};
use crate::seed::demo_ledger;
use crate::storage::JsonStorage;

use super::{default_ledger_name, output};

const SERIES_MONTHS: u32 = 6;

/// Config, storage, and the ledger a single invocation works on.
pub(super) struct Session {
    config_manager: ConfigManager,
    config: Config,
    manager: LedgerManager,
    name: String,
    reference: NaiveDate,
}

impl Session {
    pub(super) fn open(requested: Option<&str>, reference: NaiveDate) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let name = default_ledger_name(config.last_opened_ledger.as_deref(), requested);
        let storage = JsonStorage::new_default()?;
        Ok(Self {
            config_manager,
            config,
            manager: LedgerManager::new(Box::new(storage)),
            name,
            reference,
        })
    }

    fn currency(&self) -> CurrencyCode {
        self.config.currency_code()
    }

    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_currency(amount, &self.currency())
    }

    /// Opens the named ledger, seeding a demo one on first use.
    fn ledger(&mut self) -> Result<&Ledger, CliError> {
        if self.manager.current().is_none() {
            let warnings = self.manager.open_or_seed(&self.name, self.reference)?;
            for warning in warnings {
                output::warning(warning);
            }
            self.remember_ledger()?;
        }
        Ok(self.manager.ledger()?)
    }

    fn remember_ledger(&mut self) -> Result<(), CliError> {
        if self.config.last_opened_ledger.as_deref() != Some(self.name.as_str()) {
            self.config.last_opened_ledger = Some(self.name.clone());
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }
}

pub(super) fn print_help() {
    output::section("Freelance Core");
    println!("Usage: freelance_core_cli <command> [--ledger <name>] [--date YYYY-MM-DD]");
    println!();
    println!("Commands:");
    println!("  seed        Replace the ledger with generated demo records");
    println!("  dashboard   Monthly totals, receivables, tax estimate, and health score");
    println!("  insights    Observations about the month");
    println!("  expenses    Expenses for the month and the category breakdown");
    println!("  invoices    All invoices with their current status");
    println!("  help        Show this message");
    println!();
    println!("Data lives in ~/.freelance_core unless FREELANCE_CORE_HOME is set.");
}

pub(super) fn seed(session: &mut Session) -> Result<(), CliError> {
    let ledger = demo_ledger(&session.name, session.reference);
    let (expenses, invoices) = (ledger.expenses.len(), ledger.invoices.len());
    session.manager.replace(ledger, Some(&session.name));
    session.manager.save()?;
    session.remember_ledger()?;
    output::success(format!(
        "Seeded `{}` with {} expenses and {} invoices.",
        session.name, expenses, invoices
    ));
    Ok(())
}

pub(super) fn dashboard(session: &mut Session) -> Result<(), CliError> {
    let policy = session.config.tax;
    let reference = session.reference;
    let ledger = session.ledger()?;
    let stats = DashboardService::stats(ledger, reference, &policy);
    let series = DashboardService::monthly_series(ledger, reference, SERIES_MONTHS);
    let score = DashboardService::health(&stats);

    output::section(format!(
        "Dashboard {} to {}",
        stats.period.start, stats.period.end
    ));
    output::field("Income", with_change(session.money(stats.income), stats.income_change));
    output::field(
        "Expenses",
        with_change(session.money(stats.expenses), stats.expense_change),
    );
    output::field("Profit", with_change(session.money(stats.balance), stats.profit_change));
    output::field("Profit margin", format_percent(stats.profit_margin));
    output::field(
        "Pending invoices",
        format!("{} ({})", stats.pending_invoices, session.money(stats.pending_amount)),
    );
    output::field(
        "Overdue invoices",
        format!("{} ({})", stats.overdue_invoices, session.money(stats.overdue_amount)),
    );
    output::field("Deductible expenses", session.money(stats.deductible_expenses));
    output::field("Estimated tax", session.money(stats.estimated_tax.total));
    output::field(
        "Deduction savings",
        session.money(stats.estimated_deduction_savings),
    );
    output::field("Health score", format!("{}/100", score));

    output::section("Last six months");
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|point| {
            vec![
                point.label.clone(),
                session.money(point.income),
                session.money(point.expenses),
                session.money(point.profit),
            ]
        })
        .collect();
    println!(
        "{}",
        output::render_table(&["Month", "Income", "Expenses", "Profit"], &rows)
    );
    Ok(())
}

pub(super) fn insights(session: &mut Session) -> Result<(), CliError> {
    let policy = session.config.tax;
    let thresholds = session.config.insights.clone();
    let currency = session.currency();
    let reference = session.reference;
    let ledger = session.ledger()?;
    let stats = DashboardService::stats(ledger, reference, &policy);
    let breakdown = DashboardService::category_breakdown(ledger, &stats.period);
    let found = DashboardService::insights(&stats, &breakdown, &thresholds, &currency);

    output::section("Insights");
    if found.is_empty() {
        output::info("Nothing notable this month.");
    }
    for insight in &found {
        output::insight_line(
            insight.tone,
            &insight.headline,
            &insight.description,
            insight.action.as_deref(),
        );
    }
    Ok(())
}

pub(super) fn expenses(session: &mut Session) -> Result<(), CliError> {
    let window = DateWindow::month_of(session.reference);
    let currency = session.currency();
    let ledger = session.ledger()?;

    let rows: Vec<Vec<String>> = ExpenseService::list_in_window(ledger, &window)
        .into_iter()
        .map(|expense| {
            vec![
                expense.date.to_string(),
                expense.merchant.clone().unwrap_or_default(),
                ledger.category_name(expense.category_id).to_string(),
                format_currency(expense.amount, &currency),
                (if expense.is_deductible { "yes" } else { "" }).to_string(),
            ]
        })
        .collect();
    let breakdown = DashboardService::category_breakdown(ledger, &window);

    output::section(format!("Expenses {} to {}", window.start, window.end));
    if rows.is_empty() {
        output::info("No expenses recorded this month.");
    } else {
        println!(
            "{}",
            output::render_table(
                &["Date", "Merchant", "Category", "Amount", "Deductible"],
                &rows
            )
        );
    }

    output::section("By category");
    let rows: Vec<Vec<String>> = breakdown
        .iter()
        .map(|row| {
            let trend = row.trend.unwrap_or_default();
            let arrow = match TrendDirection::of(trend) {
                TrendDirection::Up => "up",
                TrendDirection::Down => "down",
                TrendDirection::Flat => "flat",
            };
            vec![
                row.name.clone(),
                format_currency(row.amount, &currency),
                format_percent(row.percentage),
                format!("{} {}", arrow, format_percent(trend.abs())),
            ]
        })
        .collect();
    println!(
        "{}",
        output::render_table(&["Category", "Amount", "Share", "Trend"], &rows)
    );
    Ok(())
}

pub(super) fn invoices(session: &mut Session) -> Result<(), CliError> {
    let reference = session.reference;
    let currency = session.currency();
    let ledger = session.ledger()?;

    let mut invoices: Vec<_> = ledger.invoices.iter().collect();
    invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
    let rows: Vec<Vec<String>> = invoices
        .into_iter()
        .map(|invoice| {
            let status = if invoice.status == InvoiceStatus::Sent && invoice.is_past_due(reference)
            {
                InvoiceStatus::Overdue
            } else {
                invoice.status
            };
            vec![
                invoice.invoice_number.clone(),
                invoice.client_name.clone(),
                invoice.issue_date.to_string(),
                invoice.due_date.to_string(),
                status.to_string(),
                format_currency(invoice.total, &currency),
            ]
        })
        .collect();

    output::section("Invoices");
    if rows.is_empty() {
        output::info("No invoices yet.");
        return Ok(());
    }
    println!(
        "{}",
        output::render_table(
            &["Number", "Client", "Issued", "Due", "Status", "Total"],
            &rows
        )
    );
    Ok(())
}

fn with_change(value: String, change: rust_decimal::Decimal) -> String {
    let sign = if change.is_sign_negative() && !change.is_zero() {
        "-"
    } else {
        "+"
    };
    format!("{} ({}{} vs last month)", value, sign, format_percent(change.abs()))
}
