use std::fmt;

use ratatui::style::{Color, Modifier, Style};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::movement::MovementKind;

const INCOME_GREEN: Color = Color::Rgb(74, 222, 128);
const EXPENSE_RED: Color = Color::Rgb(248, 113, 113);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                income: Color::Rgb(22, 163, 74),
                expense: Color::Rgb(220, 38, 38),
            },
            Theme::Dark => Palette {
                background: Color::Rgb(9, 9, 11),
                foreground: Color::Rgb(250, 250, 250),
                muted: Color::Gray,
                accent: Color::Yellow,
                income: INCOME_GREEN,
                expense: EXPENSE_RED,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub income: Color,
    pub expense: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn focused(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn kind_style(&self, kind: MovementKind) -> Style {
        match kind {
            MovementKind::Income => Style::default().fg(self.income),
            MovementKind::Expense => Style::default().fg(self.expense),
        }
    }

    /// Negative balances take the expense colour.
    pub fn balance_style(&self, balance: Decimal) -> Style {
        let kind = if balance < Decimal::ZERO {
            MovementKind::Expense
        } else {
            MovementKind::Income
        };
        self.kind_style(kind).add_modifier(Modifier::BOLD)
    }
}
