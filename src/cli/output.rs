use colored::Colorize;
use std::env;
use std::fmt;
use std::sync::Once;

use crate::analytics::insight::InsightTone;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

static COLOR_INIT: Once = Once::new();

/// Turns styling off when `NO_COLOR` is set to anything non-empty.
pub fn configure_color() {
    COLOR_INIT.call_once(|| {
        if env::var_os("NO_COLOR").map_or(false, |value| !value.is_empty()) {
            colored::control::set_override(false);
        }
    });
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{} {}", build_label(kind), text),
    };
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    configure_color();
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Label/value pair, label padded to a fixed column.
pub fn field(label: &str, value: impl fmt::Display) {
    configure_color();
    println!("  {:<22} {}", format!("{}:", label).dimmed(), value);
}

pub fn insight_line(tone: InsightTone, headline: &str, description: &str, action: Option<&str>) {
    configure_color();
    let marker = match tone {
        InsightTone::Positive => "+".bright_green(),
        InsightTone::Neutral => "*".normal(),
        InsightTone::Warning => "!".bright_yellow(),
    };
    println!("{} {}", marker, headline.bold());
    println!("    {}", description);
    if let Some(action) = action {
        println!("    -> {}", action.cyan());
    }
}

/// Renders rows as a left-aligned plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    let render_row = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(render_row(headers.iter().map(|h| h.to_string()).collect()));
    out.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(render_row(row.clone()));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns() {
        let table = render_table(
            &["Date", "Amount"],
            &[
                vec!["2024-06-01".into(), "$5.00".into()],
                vec!["2024-06-15".into(), "$1,250.00".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Date        Amount");
        assert_eq!(lines[1], "----------  ---------");
        assert_eq!(lines[3], "2024-06-15  $1,250.00");
    }
}
