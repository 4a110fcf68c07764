//! Presentation helpers for money and percentages.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

impl Default for NegativeStyle {
    fn default() -> Self {
        NegativeStyle::Sign
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub negative_style: NegativeStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

/// Rounds to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn symbol_for(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "INR" => "₹".into(),
        other => format!("{} ", other),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

/// Formats the absolute value with digit grouping and fixed precision.
pub fn format_number(options: &FormatOptions, value: Decimal, precision: u32) -> String {
    let rounded = value
        .abs()
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", precision as usize, rounded);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let mut out = group_digits(int_part, options.grouping_separator);
    if let Some(frac) = frac_part {
        out.push(options.decimal_separator);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_currency_value(amount: Decimal, code: &CurrencyCode, options: &FormatOptions) -> String {
    let body = format_number(options, amount, minor_units_for(code.as_str()));
    let symbol = symbol_for(code.as_str());
    if amount.is_sign_negative() && !amount.is_zero() {
        match options.negative_style {
            NegativeStyle::Sign => format!("-{}{}", symbol, body),
            NegativeStyle::Parentheses => format!("({}{})", symbol, body),
        }
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Shorthand for the default US-style formatting.
pub fn format_currency(amount: Decimal, code: &CurrencyCode) -> String {
    format_currency_value(amount, code, &FormatOptions::default())
}

/// One decimal place and a percent sign, e.g. `12.5%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        let usd = CurrencyCode::default();
        assert_eq!(format_currency(Decimal::new(123456789, 2), &usd), "$1,234,567.89");
        assert_eq!(format_currency(Decimal::new(-5, 1), &usd), "-$0.50");
        assert_eq!(format_currency(Decimal::ZERO, &usd), "$0.00");
    }

    #[test]
    fn respects_minor_units_and_style() {
        let yen = CurrencyCode::new("jpy");
        assert_eq!(format_currency(Decimal::new(15005, 1), &yen), "¥1,501");
        let options = FormatOptions {
            decimal_separator: ',',
            grouping_separator: '.',
            negative_style: NegativeStyle::Parentheses,
        };
        let eur = CurrencyCode::new("EUR");
        assert_eq!(
            format_currency_value(Decimal::new(-123450, 2), &eur, &options),
            "(€1.234,50)"
        );
    }

    #[test]
    fn rounds_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(10005, 3)), Decimal::new(1001, 2));
        assert_eq!(round_money(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
        assert_eq!(format_percent(Decimal::new(12345, 3)), "12.3%");
    }
}
