//! Thin command-line front end over the ledger manager and dashboard services.

mod commands;
pub mod output;

use chrono::{Local, NaiveDate};
use std::env;

pub use crate::core::errors::CliError;

const DEFAULT_LEDGER: &str = "demo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Seed,
    Dashboard,
    Insights,
    Expenses,
    Invoices,
    Help,
}

impl Command {
    fn parse(raw: &str) -> Result<Self, CliError> {
        match raw.to_ascii_lowercase().as_str() {
            "seed" => Ok(Command::Seed),
            "dashboard" | "stats" => Ok(Command::Dashboard),
            "insights" => Ok(Command::Insights),
            "expenses" => Ok(Command::Expenses),
            "invoices" => Ok(Command::Invoices),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(CliError::Input(format!("unknown command `{}`", other))),
        }
    }
}

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub ledger: Option<String>,
    pub date: Option<NaiveDate>,
}

impl CliArgs {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = None;
        let mut ledger = None;
        let mut date = None;
        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--ledger" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Input("--ledger needs a name".into()))?;
                    ledger = Some(value);
                }
                "--date" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Input("--date needs YYYY-MM-DD".into()))?;
                    date = Some(parse_date(&value)?);
                }
                other if command.is_none() => command = Some(Command::parse(other)?),
                other => {
                    return Err(CliError::Input(format!("unexpected argument `{}`", other)))
                }
            }
        }
        Ok(Self {
            command: command.unwrap_or(Command::Help),
            ledger,
            date,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CliError::Input(format!("`{}` is not a YYYY-MM-DD date", value)))
}

/// Entry point used by the `freelance_core_cli` binary.
pub fn run_cli() -> Result<(), CliError> {
    let args = CliArgs::parse(env::args().skip(1))?;
    run(args)
}

pub fn run(args: CliArgs) -> Result<(), CliError> {
    output::configure_color();
    if args.command == Command::Help {
        commands::print_help();
        return Ok(());
    }
    let reference = args.date.unwrap_or_else(|| Local::now().date_naive());
    let mut session = commands::Session::open(args.ledger.as_deref(), reference)?;
    match args.command {
        Command::Seed => commands::seed(&mut session),
        Command::Dashboard => commands::dashboard(&mut session),
        Command::Insights => commands::insights(&mut session),
        Command::Expenses => commands::expenses(&mut session),
        Command::Invoices => commands::invoices(&mut session),
        Command::Help => Ok(()),
    }
}

pub(crate) fn default_ledger_name(last_opened: Option<&str>, requested: Option<&str>) -> String {
    requested
        .or(last_opened)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_LEDGER.to_string())
}
