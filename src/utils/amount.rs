use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Largest amount, in whole units, accepted anywhere in the ledger.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// Separators used when reading and writing amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub grouping: char,
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            grouping: '.',
            decimal: ',',
        }
    }
}

impl NumberFormat {
    /// Whether a typed character may enter an amount field.
    pub fn accepts_char(&self, ch: char) -> bool {
        ch.is_ascii_digit() || ch == self.grouping || ch == self.decimal
    }

    /// Plain, ungrouped text for an amount being edited, e.g. `1234,5`.
    pub fn to_input(&self, amount: Decimal) -> String {
        amount
            .normalize()
            .to_string()
            .replace('.', &self.decimal.to_string())
    }
}

/// Parses user-entered amount text into an unsigned decimal.
///
/// Grouping separators are dropped, a single decimal separator is allowed and
/// anything else (including a minus sign) is rejected. Values above
/// [`max_amount`] fail with `AmountTooLarge`.
pub fn parse_amount(input: &str, format: &NumberFormat) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(input.to_string());
    let trimmed = input.trim();

    let mut normalized = String::with_capacity(trimmed.len() + 1);
    let mut seen_decimal = false;
    for ch in trimmed.chars() {
        if ch == format.grouping {
            continue;
        }
        if ch == format.decimal {
            if seen_decimal {
                return Err(invalid());
            }
            seen_decimal = true;
            normalized.push('.');
        } else if ch.is_ascii_digit() {
            normalized.push(ch);
        } else if ch == '-' {
            return Err(ValidationError::NegativeAmount);
        } else {
            return Err(invalid());
        }
    }

    if normalized.ends_with('.') {
        normalized.pop();
    }
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    if normalized.is_empty() {
        return Err(invalid());
    }

    let integer_digits = normalized
        .split('.')
        .next()
        .unwrap_or_default()
        .trim_start_matches('0')
        .len();
    if integer_digits > MAX_AMOUNT_UNITS.to_string().len() {
        return Err(ValidationError::AmountTooLarge);
    }

    let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    if amount > max_amount() {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount)
}
