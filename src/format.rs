//! Currency and percentage formatting.
//!
//! Calculators return full-precision amounts; this module is the only place
//! they are rounded to cents for display. Rupee amounts use Indian digit
//! grouping (`₹12,34,567.89`); other currencies group by thousands.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Currency, Jurisdiction};

/// Formats an amount with the currency's symbol and digit grouping.
///
/// # Examples
///
/// ```
/// use tax_engine::format::format_currency;
/// use tax_engine::models::Currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("1234567.891").unwrap();
/// assert_eq!(format_currency(amount, Currency::Inr), "₹12,34,567.89");
/// assert_eq!(format_currency(amount, Currency::Usd), "$1,234,567.89");
/// ```
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let grouped = match currency {
        Currency::Inr => group_indian(whole),
        Currency::Usd | Currency::Gbp | Currency::Aud => group_thousands(whole),
    };

    format!("{}{}{}.{}", sign, currency.symbol(), grouped, cents)
}

/// Formats an amount in the jurisdiction's currency.
pub fn format_amount(amount: Decimal, jurisdiction: Jurisdiction) -> String {
    format_currency(amount, jurisdiction.currency())
}

/// Formats a percentage with two decimal places, e.g. `3.90%`.
pub fn format_percent(rate: Decimal) -> String {
    let rounded = round_cents(rate);
    if rounded.is_zero() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", rounded)
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234567` -> `1,234,567`
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `12,34,567`: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{},{}", group_pairs(head), tail)
}

fn group_pairs(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
