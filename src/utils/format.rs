use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::utils::amount::NumberFormat;

/// Rounds half away from zero and inserts the grouping separator every three
/// integer digits: `1234567.891` with 2 decimals becomes `1.234.567,89`.
pub fn format_grouped(amount: Decimal, decimals: u32, format: &NumberFormat) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(format.grouping);
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(format.decimal);
        out.push_str(fraction);
    }
    out
}

/// Grouped amount with the currency symbol; negatives read `-$1.300`.
pub fn format_money(amount: Decimal, decimals: u32, symbol: &str, format: &NumberFormat) -> String {
    let grouped = format_grouped(amount, decimals, format);
    match grouped.strip_prefix('-') {
        Some(unsigned) => format!("-{symbol}{unsigned}"),
        None => format!("{symbol}{grouped}"),
    }
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%d/%m/%Y").to_string()
}
