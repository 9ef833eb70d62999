use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use ratatui::{
    text::{Line, Span},
    widgets::ListItem,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ui::theme::Palette;
use crate::utils::amount::NumberFormat;
use crate::utils::format::{format_date, format_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(pub u64);

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    #[default]
    Expense,
    Income,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Expense => "Expense",
            MovementKind::Income => "Income",
        }
    }

    pub fn all() -> [MovementKind; 2] {
        [MovementKind::Income, MovementKind::Expense]
    }

    pub fn toggled(self) -> Self {
        match self {
            MovementKind::Expense => MovementKind::Income,
            MovementKind::Income => MovementKind::Expense,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    // Also accepts the Spanish labels `gasto`/`ingreso`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "gasto" => Ok(MovementKind::Expense),
            "income" | "ingreso" => Ok(MovementKind::Income),
            _ => Err(ValidationError::InvalidKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub description: String,
    pub amount: Decimal,
    pub kind: MovementKind,
    pub date: NaiveDateTime,
}

impl Movement {
    /// Amount with the sign implied by the kind.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Income => self.amount,
            MovementKind::Expense => -self.amount,
        }
    }

    pub fn to_list_item(
        &self,
        palette: &Palette,
        format: &NumberFormat,
        currency_symbol: &str,
    ) -> ListItem<'static> {
        let kind_style = palette.kind_style(self.kind);

        ListItem::new(Line::from(vec![
            Span::styled(format!("{:<10} ", format_date(&self.date)), palette.muted()),
            Span::raw(format!("{:<30} ", self.description)),
            Span::styled(
                format!("{:>14} ", format_money(self.amount, 2, currency_symbol, format)),
                kind_style,
            ),
            Span::styled(self.kind.as_str(), kind_style),
        ]))
    }
}
