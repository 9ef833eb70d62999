use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::app::{App, AuthField, AuthMode, EditField, EditForm, Focus, Screen, StatusLevel};
use super::theme::Palette;
use crate::models::aggregate::{aggregate_by_month, category_split};
use crate::models::movement::MovementKind;
use crate::utils::format::{format_grouped, format_money};

const APP_TITLE: &str = "Expense Tracker";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let palette = app.theme.palette();
    f.render_widget(Block::default().style(palette.base()), size);

    match app.screen {
        Screen::Ledger if app.auth.is_authenticated() => render_ledger(f, app, &palette, size),
        _ => render_auth(f, app, &palette, size),
    }
}

fn render_ledger(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, app, palette, chunks[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(6)])
        .split(top[0]);

    render_summary(f, app, palette, left[0]);
    render_entry_form(f, app, palette, left[1]);
    render_movement_list(f, app, palette, top[1]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_month_chart(f, app, palette, charts[0]);
    render_split(f, app, palette, charts[1]);

    render_status(f, app, palette, chunks[3]);
    render_help_panel(f, app, palette, chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let user = app
        .auth
        .current_user()
        .map(|u| u.email.as_str())
        .unwrap_or("-");

    let header = Paragraph::new(Line::from(vec![
        Span::styled(APP_TITLE, palette.focused()),
        Span::raw("   "),
        Span::styled(format!("user: {user}"), palette.muted()),
        Span::raw("   "),
        Span::styled(format!("theme: {}", app.theme), palette.muted()),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

pub fn render_summary(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let totals = app.ledger.totals();
    let symbol = app.config.currency_symbol.as_str();
    let format = &app.number_format;
    let opening = app.ledger.opening_balance().unwrap_or(Decimal::ZERO);

    let text = vec![
        Line::from(vec![
            Span::styled("Opening balance: ", palette.muted()),
            Span::raw(format_money(opening, 0, symbol, format)),
        ]),
        Line::from(vec![
            Span::styled("Total expenses:  ", palette.muted()),
            Span::styled(
                format_money(totals.total_expenses, 0, symbol, format),
                palette.kind_style(MovementKind::Expense),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total income:    ", palette.muted()),
            Span::styled(
                format_money(totals.total_income, 0, symbol, format),
                palette.kind_style(MovementKind::Income),
            ),
        ]),
        Line::from(vec![
            Span::styled("Current balance: ", palette.muted()),
            Span::styled(
                format_money(totals.current_balance, 0, symbol, format),
                palette.balance_style(totals.current_balance),
            ),
        ]),
    ];

    let summary = Paragraph::new(text).block(
        Block::default()
            .title("Financial Summary")
            .borders(Borders::ALL),
    );

    f.render_widget(summary, area);
}

fn field_line<'a>(
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
    palette: &Palette,
) -> Line<'a> {
    let label_style = if focused {
        palette.focused()
    } else {
        palette.muted()
    };
    let value_span = if value.is_empty() {
        Span::styled(placeholder, palette.muted().add_modifier(Modifier::ITALIC))
    } else {
        Span::raw(value)
    };

    let mut spans = vec![Span::styled(label, label_style), value_span];
    if focused {
        spans.push(Span::styled("▏", palette.accent()));
    }
    Line::from(spans)
}

fn kind_selector<'a>(selected: MovementKind, focused: bool, palette: &Palette) -> Vec<Span<'a>> {
    MovementKind::all()
        .into_iter()
        .flat_map(|kind| {
            let marker = if kind == selected { "(•) " } else { "( ) " };
            let mut style = palette.kind_style(kind);
            if focused && kind == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [Span::styled(format!("{marker}{}", kind.as_str()), style), Span::raw("  ")]
        })
        .collect()
}

fn render_entry_form(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let entry = &app.entry;
    let on_form = app.edit.is_none();

    let kind_label_style = if on_form && app.focus == Focus::Kind {
        palette.focused()
    } else {
        palette.muted()
    };
    let mut kind_line = vec![Span::styled("Kind:            ", kind_label_style)];
    kind_line.extend(kind_selector(entry.kind, on_form && app.focus == Focus::Kind, palette));

    let text = vec![
        field_line(
            "Opening balance: ",
            &entry.opening_balance,
            "Enter the opening balance",
            on_form && app.focus == Focus::OpeningBalance,
            palette,
        ),
        field_line(
            "Description:     ",
            &entry.description,
            "Enter a description",
            on_form && app.focus == Focus::Description,
            palette,
        ),
        field_line(
            "Amount:          ",
            &entry.amount,
            "Enter the amount",
            on_form && app.focus == Focus::Amount,
            palette,
        ),
        Line::from(kind_line),
    ];

    let title = format!("Add {}", entry.kind.as_str());
    let form = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));

    f.render_widget(form, area);
}

fn edit_item(edit: &EditForm, palette: &Palette) -> ListItem<'static> {
    let style_for = |field: EditField| {
        if edit.field == field {
            palette.focused().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        }
    };

    ListItem::new(Line::from(vec![
        Span::styled("✎ ", palette.accent()),
        Span::styled(format!("[{}]", edit.description), style_for(EditField::Description)),
        Span::raw(" "),
        Span::styled(format!("[{}]", edit.amount), style_for(EditField::Amount)),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", edit.kind.as_str()),
            palette.kind_style(edit.kind).patch(style_for(EditField::Kind)),
        ),
    ]))
}

pub fn render_movement_list(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let movements = app.ledger.movements();
    let border_style = if app.focus == Focus::Movements || app.edit.is_some() {
        palette.accent()
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(format!("Movements ({})", movements.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if movements.is_empty() {
        let empty = Paragraph::new(Line::from("No movements recorded."))
            .style(palette.muted())
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let symbol = app.config.currency_symbol.as_str();
    let items: Vec<ListItem> = movements
        .iter()
        .map(|movement| match &app.edit {
            Some(edit) if edit.id == movement.id => edit_item(edit, palette),
            _ => movement.to_list_item(palette, &app.number_format, symbol),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("➤ ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());
}

fn whole_units(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(u64::MAX)
}

pub fn render_month_chart(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let months = aggregate_by_month(app.ledger.movements(), app.config.month_locale);
    let title = Line::from(vec![
        Span::raw("Income and Expenses by Month  "),
        Span::styled("■ Income ", palette.kind_style(MovementKind::Income)),
        Span::styled("■ Expense", palette.kind_style(MovementKind::Expense)),
    ]);
    let block = Block::default().title(title).borders(Borders::ALL);

    if months.is_empty() {
        let empty = Paragraph::new("No data yet.")
            .style(palette.muted())
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let format = &app.number_format;
    let mut chart = BarChart::default()
        .block(block)
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3);

    for month in &months {
        let bars = [
            Bar::default()
                .value(whole_units(month.income_total))
                .text_value(format_grouped(month.income_total, 0, format))
                .style(palette.kind_style(MovementKind::Income)),
            Bar::default()
                .value(whole_units(month.expense_total))
                .text_value(format_grouped(month.expense_total, 0, format))
                .style(palette.kind_style(MovementKind::Expense)),
        ];
        let label: String = month.month.chars().take(3).collect();
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }

    f.render_widget(chart, area);
}

/// Rounds a percentage to what a `Gauge` accepts.
pub fn percent_label(percent: Decimal) -> u16 {
    percent.round().to_u16().unwrap_or(0).min(100)
}

pub fn render_split(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let split = category_split(app.ledger.movements());
    let block = Block::default()
        .title("Income vs Expenses")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    for (row, slice) in [rows[0], rows[2]].into_iter().zip(split.entries()) {
        let kind = if slice.name == MovementKind::Income.as_str() {
            MovementKind::Income
        } else {
            MovementKind::Expense
        };
        let percent = percent_label(split.percent(kind));
        let gauge = Gauge::default()
            .gauge_style(palette.kind_style(kind))
            .percent(percent)
            .label(format!("{} {}%", slice.name, percent));
        f.render_widget(gauge, row);
    }
}

fn render_status(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let style = match status.level {
        StatusLevel::Info => palette.kind_style(MovementKind::Income),
        StatusLevel::Error => palette.kind_style(MovementKind::Expense),
    };
    f.render_widget(Paragraph::new(status.text.as_str()).style(style), area);
}

fn help_line<'a>(entries: &[(&'a str, &'a str)], palette: &Palette) -> Line<'a> {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (i, (key, action)) in entries.iter().enumerate() {
        spans.push(Span::styled(*key, palette.accent()));
        let sep = if i + 1 == entries.len() { "" } else { " • " };
        spans.push(Span::raw(format!(" {action}{sep}")));
    }
    Line::from(spans)
}

pub fn render_help_panel(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let screen = if app.auth.is_authenticated() {
        app.screen
    } else {
        Screen::Auth
    };
    let entries: &[(&str, &str)] = match (screen, app.edit.is_some(), app.focus) {
        (Screen::Auth, _, _) => &[
            ("Tab", "Field"),
            ("Enter", "Submit"),
            ("^R", "Login/Register"),
            ("^P", "Show password"),
            ("^T", "Theme"),
            ("^Q", "Quit"),
        ],
        (Screen::Ledger, true, _) => &[
            ("Tab", "Field"),
            ("←/→", "Kind"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
        ],
        (Screen::Ledger, false, Focus::Movements) => &[
            ("↑/↓", "Move"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("Tab", "Focus"),
            ("^T", "Theme"),
            ("^L", "Logout"),
            ("q", "Quit"),
        ],
        (Screen::Ledger, false, _) => &[
            ("Tab", "Focus"),
            ("Enter", "Add"),
            ("←/→", "Kind"),
            ("^T", "Theme"),
            ("^L", "Logout"),
            ("^Q", "Quit"),
        ],
    };

    let help = Paragraph::new(help_line(entries, palette))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted())
                .title(" Help "),
        )
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

fn masked(value: &str, show: bool) -> String {
    if show {
        value.to_string()
    } else {
        "•".repeat(value.chars().count())
    }
}

pub fn render_auth(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let form = &app.auth_form;
    let (title, submit) = match form.mode {
        AuthMode::Login => ("Log in", "Enter to log in • ^R to register"),
        AuthMode::Register => ("Register", "Enter to register • ^R back to log in"),
    };

    let password = masked(&form.password, form.show_password);
    let confirm = masked(&form.confirm, form.show_password);

    let mut text = vec![
        Line::from(Span::styled(APP_TITLE, palette.focused())),
        Line::from(""),
        field_line(
            "Email:    ",
            &form.email,
            "you@example.com",
            form.field == AuthField::Email,
            palette,
        ),
        field_line(
            "Password: ",
            &password,
            "password",
            form.field == AuthField::Password,
            palette,
        ),
    ];
    if form.mode == AuthMode::Register {
        text.push(field_line(
            "Confirm:  ",
            &confirm,
            "repeat password",
            form.field == AuthField::Confirm,
            palette,
        ));
    }
    text.push(Line::from(""));
    if let Some(error) = &form.error {
        text.push(Line::from(Span::styled(
            error.as_str(),
            palette.kind_style(MovementKind::Expense),
        )));
    } else if let Some(status) = &app.status {
        text.push(Line::from(Span::styled(
            status.text.as_str(),
            palette.kind_style(MovementKind::Income),
        )));
    }
    text.push(Line::from(Span::styled(submit, palette.muted())));

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(palette.accent()),
    );

    let popup_area = centered_rect(50, 50, area);
    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph.style(palette.base()), popup_area);

    let help_height = area.height.min(3);
    let help_area = Rect::new(
        area.x,
        area.bottom().saturating_sub(help_height),
        area.width,
        help_height,
    );
    render_help_panel(f, app, palette, help_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(layout[1])[1]
}
