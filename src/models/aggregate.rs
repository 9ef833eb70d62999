use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::movement::{Movement, MovementKind};

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Locale used for month labels. Fixed per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    English,
    Spanish,
}

impl MonthLocale {
    /// `month` is 1-based, as returned by `chrono::Datelike::month`.
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            MonthLocale::English => &ENGLISH_MONTHS,
            MonthLocale::Spanish => &SPANISH_MONTHS,
        };
        let index = (month.clamp(1, 12) - 1) as usize;
        names[index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: &'static str,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

/// Per-month income and expense sums.
///
/// Groups come out in the order their month was first seen in `movements`,
/// not in calendar order. Months are keyed by name only, so the same month of
/// two different years lands in one group.
pub fn aggregate_by_month(movements: &[Movement], locale: MonthLocale) -> Vec<MonthTotals> {
    let mut groups: Vec<(u32, MonthTotals)> = Vec::new();

    for movement in movements {
        let month = movement.date.month();
        let index = match groups.iter().position(|(key, _)| *key == month) {
            Some(index) => index,
            None => {
                groups.push((
                    month,
                    MonthTotals {
                        month: locale.month_name(month),
                        income_total: Decimal::ZERO,
                        expense_total: Decimal::ZERO,
                    },
                ));
                groups.len() - 1
            }
        };

        let totals = &mut groups[index].1;
        match movement.kind {
            MovementKind::Income => {
                totals.income_total = totals.income_total.saturating_add(movement.amount);
            }
            MovementKind::Expense => {
                totals.expense_total = totals.expense_total.saturating_add(movement.amount);
            }
        }
    }

    groups.into_iter().map(|(_, totals)| totals).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub name: &'static str,
    pub value: Decimal,
}

/// Income against expense, for proportion charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySplit {
    pub income: Decimal,
    pub expense: Decimal,
}

impl CategorySplit {
    pub fn entries(&self) -> [CategorySlice; 2] {
        [
            CategorySlice {
                name: MovementKind::Income.as_str(),
                value: self.income,
            },
            CategorySlice {
                name: MovementKind::Expense.as_str(),
                value: self.expense,
            },
        ]
    }

    pub fn total(&self) -> Decimal {
        self.income.saturating_add(self.expense)
    }

    pub fn value(&self, kind: MovementKind) -> Decimal {
        match kind {
            MovementKind::Income => self.income,
            MovementKind::Expense => self.expense,
        }
    }

    /// Share of `kind` in percent, unrounded. Zero when there is nothing recorded.
    pub fn percent(&self, kind: MovementKind) -> Decimal {
        let total = self.total();
        if total.is_zero() {
            return Decimal::ZERO;
        }
        // Dividing first keeps the intermediate at or below one.
        self.value(kind) / total * Decimal::from(100)
    }
}

pub fn category_split(movements: &[Movement]) -> CategorySplit {
    movements
        .iter()
        .fold(CategorySplit::default(), |mut split, movement| {
            match movement.kind {
                MovementKind::Income => split.income = split.income.saturating_add(movement.amount),
                MovementKind::Expense => {
                    split.expense = split.expense.saturating_add(movement.amount);
                }
            }
            split
        })
}
