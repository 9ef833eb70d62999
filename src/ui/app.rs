use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::debug;

use crate::config::Config;
use crate::error::LedgerError;
use crate::models::{
    ledger::{Ledger, LedgerEvent},
    movement::{MovementId, MovementKind},
};
use crate::session::auth::Auth;
use crate::ui::theme::Theme;
use crate::utils::amount::{NumberFormat, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Ledger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    Confirm,
}

/// Focusable areas of the ledger screen, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    OpeningBalance,
    Description,
    Amount,
    Kind,
    Movements,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::OpeningBalance,
        Focus::Description,
        Focus::Amount,
        Focus::Kind,
        Focus::Movements,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Description,
    Amount,
    Kind,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Description => EditField::Amount,
            EditField::Amount => EditField::Kind,
            EditField::Kind => EditField::Description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub field: AuthField,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub show_password: bool,
    pub error: Option<String>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            field: AuthField::Email,
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            show_password: false,
            error: None,
        }
    }
}

impl AuthForm {
    fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Register => &[AuthField::Email, AuthField::Password, AuthField::Confirm],
        }
    }

    fn cycle_field(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
    }

    fn input_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.clear();
    }

    fn clear(&mut self) {
        self.field = AuthField::Email;
        self.email.clear();
        self.password.clear();
        self.confirm.clear();
        self.error = None;
    }
}

/// Text typed into the add-movement form. Parsed only on submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryForm {
    pub opening_balance: String,
    pub description: String,
    pub amount: String,
    pub kind: MovementKind,
}

impl EntryForm {
    fn reset_movement_fields(&mut self) {
        self.description.clear();
        self.amount.clear();
        self.kind = MovementKind::Expense;
    }
}

/// Inline editor for one row of the movement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: MovementId,
    pub description: String,
    pub amount: String,
    pub kind: MovementKind,
    pub field: EditField,
}

#[derive(Debug)]
pub struct App {
    pub ledger: Ledger,
    pub auth: Auth,
    pub theme: Theme,
    pub config: Config,
    pub number_format: NumberFormat,
    pub screen: Screen,
    pub auth_form: AuthForm,
    pub entry: EntryForm,
    pub focus: Focus,
    pub edit: Option<EditForm>,
    pub list_state: ListState,
    pub status: Option<Status>,
    pub should_quit: bool,
    events: Rc<RefCell<Vec<LedgerEvent>>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_ledger(config, Ledger::new())
    }

    pub fn with_ledger(config: Config, mut ledger: Ledger) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        ledger.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        App {
            ledger,
            auth: Auth::new(),
            theme: config.theme,
            number_format: config.number_format(),
            config,
            screen: Screen::Auth,
            auth_form: AuthForm::default(),
            entry: EntryForm::default(),
            focus: Focus::OpeningBalance,
            edit: None,
            list_state: ListState::default(),
            status: None,
            should_quit: false,
            events,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Char('l') if self.screen == Screen::Ledger => self.logout(),
                KeyCode::Char('r') if self.screen == Screen::Auth => self.auth_form.toggle_mode(),
                KeyCode::Char('p') if self.screen == Screen::Auth => {
                    self.auth_form.show_password = !self.auth_form.show_password;
                }
                _ => {}
            }
            return;
        }

        match self.screen {
            Screen::Auth => self.handle_auth_key(key.code),
            Screen::Ledger if !self.auth.is_authenticated() => {
                debug!("ledger screen without a user, back to login");
                self.screen = Screen::Auth;
            }
            Screen::Ledger if self.edit.is_some() => self.handle_edit_key(key.code),
            Screen::Ledger => self.handle_ledger_key(key.code),
        }
        self.process_ledger_events();
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
        debug!(theme = self.theme.as_str(), "theme toggled");
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level: StatusLevel::Info,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level: StatusLevel::Error,
        });
    }

    fn handle_auth_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Down => self.auth_form.cycle_field(true),
            KeyCode::BackTab | KeyCode::Up => self.auth_form.cycle_field(false),
            KeyCode::Enter => self.submit_auth(),
            KeyCode::Backspace => {
                self.auth_form.input_mut().pop();
            }
            KeyCode::Char(c) => self.auth_form.input_mut().push(c),
            _ => {}
        }
    }

    fn submit_auth(&mut self) {
        match self.auth_form.mode {
            AuthMode::Login => match self.auth.login(&self.auth_form.email) {
                Ok(user) => {
                    let welcome = format!("Welcome, {}", user.email);
                    self.auth_form.clear();
                    self.screen = Screen::Ledger;
                    self.focus = Focus::OpeningBalance;
                    self.set_info(welcome);
                }
                Err(err) => self.auth_form.error = Some(err.to_string()),
            },
            AuthMode::Register => {
                let result = self.auth.register(
                    &self.auth_form.email,
                    &self.auth_form.password,
                    &self.auth_form.confirm,
                );
                match result {
                    Ok(()) => {
                        self.auth_form.toggle_mode();
                        self.set_info("Registration successful. Please log in.");
                    }
                    Err(err) => self.auth_form.error = Some(err.to_string()),
                }
            }
        }
    }

    /// Leaving the session discards its ledger, like closing the page did.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.ledger.reset();
        self.process_ledger_events();
        self.entry = EntryForm::default();
        self.edit = None;
        self.list_state = ListState::default();
        self.screen = Screen::Auth;
        self.auth_form = AuthForm::default();
        self.status = None;
    }

    fn handle_ledger_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Esc => self.status = None,
            _ => match self.focus {
                Focus::OpeningBalance => self.handle_opening_balance_key(code),
                Focus::Description | Focus::Amount => self.handle_entry_text_key(code),
                Focus::Kind => match code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                        self.entry.kind = self.entry.kind.toggled();
                    }
                    KeyCode::Enter => self.submit_entry(),
                    _ => {}
                },
                Focus::Movements => self.handle_movement_list_key(code),
            },
        }
    }

    fn handle_opening_balance_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if self.number_format.accepts_char(c) => {
                self.entry.opening_balance.push(c);
                self.apply_opening_balance();
            }
            KeyCode::Backspace => {
                self.entry.opening_balance.pop();
                self.apply_opening_balance();
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            _ => {}
        }
    }

    /// Pushes the opening-balance text into the ledger after every keystroke.
    pub fn apply_opening_balance(&mut self) {
        let raw = self.entry.opening_balance.trim();
        if raw.is_empty() {
            self.ledger.clear_opening_balance();
            return;
        }

        let result = parse_amount(raw, &self.number_format)
            .map_err(LedgerError::from)
            .and_then(|value| self.ledger.set_opening_balance(value));
        if let Err(err) = result {
            self.set_error(err.to_string());
        }
    }

    fn handle_entry_text_key(&mut self, code: KeyCode) {
        let is_amount = self.focus == Focus::Amount;
        match code {
            KeyCode::Enter => self.submit_entry(),
            KeyCode::Backspace => {
                if is_amount {
                    self.entry.amount.pop();
                } else {
                    self.entry.description.pop();
                }
            }
            KeyCode::Char(c) if is_amount => {
                if self.number_format.accepts_char(c) {
                    self.entry.amount.push(c);
                }
            }
            KeyCode::Char(c) => self.entry.description.push(c),
            _ => {}
        }
    }

    pub fn submit_entry(&mut self) {
        let result = parse_amount(&self.entry.amount, &self.number_format)
            .map_err(LedgerError::from)
            .and_then(|amount| {
                self.ledger
                    .add_movement(&self.entry.description, amount, self.entry.kind)
            });

        match result {
            Ok(_) => {
                self.entry.reset_movement_fields();
                self.focus = Focus::Description;
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn handle_movement_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit_selected(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_id(&self) -> Option<MovementId> {
        let index = self.list_state.selected()?;
        self.ledger.movements().get(index).map(|m| m.id)
    }

    pub fn begin_edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        // A missing id just leaves the list as it is.
        if let Ok(buffer) = self.ledger.begin_edit(id) {
            self.edit = Some(EditForm {
                id,
                description: buffer.description,
                amount: self.number_format.to_input(buffer.amount),
                kind: buffer.kind,
                field: EditField::Description,
            });
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.ledger.delete_movement(id);
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let format = self.number_format;
        let Some(edit) = self.edit.as_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Tab => edit.field = edit.field.next(),
            KeyCode::Backspace => match edit.field {
                EditField::Description => {
                    edit.description.pop();
                }
                EditField::Amount => {
                    edit.amount.pop();
                }
                EditField::Kind => {}
            },
            KeyCode::Left | KeyCode::Right if edit.field == EditField::Kind => {
                edit.kind = edit.kind.toggled();
            }
            KeyCode::Char(' ') if edit.field == EditField::Kind => {
                edit.kind = edit.kind.toggled();
            }
            KeyCode::Char(c) => match edit.field {
                EditField::Description => edit.description.push(c),
                EditField::Amount if format.accepts_char(c) => edit.amount.push(c),
                _ => {}
            },
            _ => {}
        }
    }

    pub fn commit_edit(&mut self) {
        let Some(edit) = self.edit.as_ref() else {
            return;
        };

        let result = parse_amount(&edit.amount, &self.number_format)
            .map_err(LedgerError::from)
            .and_then(|amount| {
                self.ledger
                    .commit_edit(edit.id, &edit.description, amount, edit.kind)
            });

        match result {
            Ok(()) => self.edit = None,
            Err(LedgerError::NotFound(id)) => {
                debug!(%id, "edited movement disappeared");
                self.ledger.cancel_edit();
                self.edit = None;
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.ledger.cancel_edit();
        self.edit = None;
    }

    /// Reacts to what the ledger reported since the last key press.
    fn process_ledger_events(&mut self) {
        let events: Vec<LedgerEvent> = self.events.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                LedgerEvent::MovementAdded(id) => {
                    self.list_state.select(self.ledger.len().checked_sub(1));
                    self.set_info(format!("Movement {id} added"));
                }
                LedgerEvent::MovementUpdated(id) => {
                    self.set_info(format!("Movement {id} updated"));
                }
                LedgerEvent::MovementDeleted(id) => {
                    let len = self.ledger.len();
                    let selected = match self.list_state.selected() {
                        _ if len == 0 => None,
                        Some(i) if i >= len => Some(len - 1),
                        other => other,
                    };
                    self.list_state.select(selected);
                    if self.edit.as_ref().is_some_and(|edit| edit.id == id) {
                        self.edit = None;
                    }
                    self.set_info(format!("Movement {id} deleted"));
                }
                LedgerEvent::OpeningBalanceChanged(_) => {
                    if self
                        .status
                        .as_ref()
                        .is_some_and(|status| status.level == StatusLevel::Error)
                    {
                        self.status = None;
                    }
                }
                LedgerEvent::Cleared => {
                    self.list_state.select(None);
                    self.edit = None;
                }
                LedgerEvent::EditStarted(_) | LedgerEvent::EditCancelled => {}
            }
        }
    }
}
