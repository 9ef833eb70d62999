use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use expense_tracker::MovementKind;
use expense_tracker::config::Config;
use expense_tracker::ui::app::{App, AuthMode, Focus, Screen};
use expense_tracker::ui::render;
use expense_tracker::ui::theme::Theme;
use ratatui::{Terminal, backend::TestBackend};
use rust_decimal_macros::dec;

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App, c: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn logged_in() -> App {
    let mut app = App::new(Config::default());
    type_text(&mut app, "ana@example.com");
    press(&mut app, KeyCode::Enter);
    app
}

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| render::draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn add_movement(app: &mut App, description: &str, amount: &str, kind: MovementKind) {
    app.focus = Focus::Description;
    type_text(app, description);
    press(app, KeyCode::Tab);
    type_text(app, amount);
    if kind == MovementKind::Income {
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
    }
    press(app, KeyCode::Enter);
}

#[test]
fn login_requires_an_email() {
    let mut app = App::new(Config::default());

    press(&mut app, KeyCode::Enter);

    assert_eq!(app.screen, Screen::Auth);
    assert!(app.auth_form.error.is_some());
    assert!(screen_text(&app).contains("Log in"));
}

#[test]
fn register_reports_password_mismatch() {
    let mut app = App::new(Config::default());
    ctrl(&mut app, 'r');
    assert_eq!(app.auth_form.mode, AuthMode::Register);

    type_text(&mut app, "ana@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secret");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secreT");
    press(&mut app, KeyCode::Enter);

    assert!(app.auth_form.error.is_some());
    assert!(!screen_text(&app).contains("secret"));
}

#[test]
fn fresh_session_shows_empty_state() {
    let app = logged_in();

    assert_eq!(app.screen, Screen::Ledger);
    let text = screen_text(&app);
    assert!(text.contains("ana@example.com"));
    assert!(text.contains("No movements recorded."));
    assert!(text.contains("No data yet."));
}

#[test]
fn typed_entries_update_the_summary() {
    let mut app = logged_in();
    type_text(&mut app, "1000");
    assert_eq!(app.ledger.opening_balance(), Some(dec!(1000)));

    add_movement(&mut app, "groceries", "200", MovementKind::Expense);
    add_movement(&mut app, "salary", "500", MovementKind::Income);

    let totals = app.ledger.totals();
    assert_eq!(totals.total_expenses, dec!(200));
    assert_eq!(totals.total_income, dec!(500));
    assert_eq!(totals.current_balance, dec!(1300));
    assert!(app.entry.description.is_empty());
    assert_eq!(app.entry.kind, MovementKind::Expense);

    let text = screen_text(&app);
    assert!(text.contains("$1.300"));
    assert!(text.contains("groceries"));
    assert!(text.contains("Movements (2)"));
}

#[test]
fn invalid_amount_is_reported_and_nothing_is_added() {
    let mut app = logged_in();

    add_movement(&mut app, "taxi", "", MovementKind::Expense);

    assert!(app.ledger.is_empty());
    assert!(app.status.is_some());
    assert_eq!(app.entry.description, "taxi");
}

#[test]
fn oversized_amount_is_reported_and_the_app_keeps_drawing() {
    let mut app = logged_in();

    add_movement(&mut app, "jackpot", "79228162514264337593543950335", MovementKind::Income);
    add_movement(&mut app, "jackpot", "79228162514264337593543950335", MovementKind::Income);

    assert!(app.ledger.is_empty());
    assert!(app.status.is_some());
    assert!(screen_text(&app).contains("Amount is too large"));
}

#[test]
fn ledger_screen_needs_a_logged_in_user() {
    let mut app = App::new(Config::default());
    app.screen = Screen::Ledger;

    assert!(screen_text(&app).contains("Log in"));

    press(&mut app, KeyCode::Char('x'));

    assert_eq!(app.screen, Screen::Auth);
    assert!(app.ledger.is_empty());
}

#[test]
fn edit_and_delete_from_the_list() {
    let mut app = logged_in();
    add_movement(&mut app, "groceries", "200", MovementKind::Expense);
    add_movement(&mut app, "salary", "500", MovementKind::Income);

    app.focus = Focus::Movements;
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Char('e'));
    assert!(app.edit.is_some());

    press(&mut app, KeyCode::Tab);
    for _ in 0..3 {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "150");
    press(&mut app, KeyCode::Enter);

    assert!(app.edit.is_none());
    assert_eq!(app.ledger.totals().total_expenses, dec!(150));
    assert_eq!(app.ledger.movements()[0].description, "groceries");

    press(&mut app, KeyCode::Char('d'));

    assert_eq!(app.ledger.len(), 1);
    assert_eq!(app.ledger.totals().total_expenses, dec!(0));
    assert_eq!(app.list_state.selected(), Some(0));
}

#[test]
fn escape_cancels_an_edit() {
    let mut app = logged_in();
    add_movement(&mut app, "bus", "3", MovementKind::Expense);
    app.focus = Focus::Movements;

    press(&mut app, KeyCode::Enter);
    type_text(&mut app, " pass");
    press(&mut app, KeyCode::Esc);

    assert!(app.edit.is_none());
    assert!(app.ledger.editing().is_none());
    assert_eq!(app.ledger.movements()[0].description, "bus");
}

#[test]
fn theme_toggle_and_logout() {
    let mut app = logged_in();
    add_movement(&mut app, "book", "12", MovementKind::Expense);

    ctrl(&mut app, 't');
    assert_eq!(app.theme, Theme::Light);

    ctrl(&mut app, 'l');
    assert_eq!(app.screen, Screen::Auth);
    assert!(!app.auth.is_authenticated());
    assert!(app.ledger.is_empty());
}

#[test]
fn ctrl_q_quits() {
    let mut app = App::new(Config::default());

    ctrl(&mut app, 'q');

    assert!(app.should_quit);
}
