use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{LedgerError, ValidationError};
use crate::models::clock::{Clock, SystemClock};
use crate::models::movement::{Movement, MovementId, MovementKind};
use crate::utils::amount::max_amount;

/// Figures derived from the ledger contents. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub current_balance: Decimal,
}

/// Fields of the movement currently in edit mode, as they were when editing began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: MovementId,
    pub description: String,
    pub amount: Decimal,
    pub kind: MovementKind,
}

/// Emitted to subscribers after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    OpeningBalanceChanged(Option<Decimal>),
    MovementAdded(MovementId),
    MovementUpdated(MovementId),
    MovementDeleted(MovementId),
    EditStarted(MovementId),
    EditCancelled,
    Cleared,
}

pub type Listener = Box<dyn FnMut(&LedgerEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountRule {
    Positive,
    NonNegative,
}

/// Session ledger: the opening balance plus the movements recorded since.
///
/// Movements keep insertion order. Ids come from a counter that is never
/// rewound, so an id is not handed out twice even after deletions.
pub struct Ledger {
    opening_balance: Option<Decimal>,
    movements: Vec<Movement>,
    editing: Option<EditBuffer>,
    next_id: u64,
    clock: Box<dyn Clock>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("opening_balance", &self.opening_balance)
            .field("movements", &self.movements)
            .field("editing", &self.editing)
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        Self {
            opening_balance: None,
            movements: Vec::new(),
            editing: None,
            next_id: 1,
            clock: Box::new(clock),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&LedgerEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: LedgerEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn opening_balance(&self) -> Option<Decimal> {
        self.opening_balance
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn movement(&self, id: MovementId) -> Option<&Movement> {
        self.movements.iter().find(|m| m.id == id)
    }

    pub fn editing(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn set_opening_balance(&mut self, value: Decimal) -> Result<(), LedgerError> {
        let value = validate_amount(value, AmountRule::NonNegative)?;
        self.opening_balance = Some(value);
        debug!(opening_balance = %value, "opening balance set");
        self.notify(LedgerEvent::OpeningBalanceChanged(Some(value)));
        Ok(())
    }

    pub fn clear_opening_balance(&mut self) {
        if self.opening_balance.take().is_some() {
            debug!("opening balance cleared");
            self.notify(LedgerEvent::OpeningBalanceChanged(None));
        }
    }

    pub fn add_movement(
        &mut self,
        description: &str,
        amount: Decimal,
        kind: MovementKind,
    ) -> Result<MovementId, LedgerError> {
        let description = validate_description(description)?;
        let amount = validate_amount(amount, AmountRule::Positive)?;
        self.check_headroom(kind, amount, None)?;

        let id = MovementId(self.next_id);
        self.next_id += 1;

        self.movements.push(Movement {
            id,
            description,
            amount,
            kind,
            date: self.clock.now(),
        });
        info!(%id, %amount, kind = kind.as_str(), "movement added");
        self.notify(LedgerEvent::MovementAdded(id));
        Ok(id)
    }

    /// Removes the movement. A missing id is not an error; `None` is returned.
    pub fn delete_movement(&mut self, id: MovementId) -> Option<Movement> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete ignored, movement not found");
            return None;
        };

        let removed = self.movements.remove(index);
        if self.editing.as_ref().is_some_and(|buffer| buffer.id == id) {
            self.editing = None;
        }
        info!(%id, "movement deleted");
        self.notify(LedgerEvent::MovementDeleted(id));
        Some(removed)
    }

    pub fn begin_edit(&mut self, id: MovementId) -> Result<EditBuffer, LedgerError> {
        let movement = self.movement(id).ok_or(LedgerError::NotFound(id))?;
        let buffer = EditBuffer {
            id,
            description: movement.description.clone(),
            amount: movement.amount,
            kind: movement.kind,
        };

        self.editing = Some(buffer.clone());
        debug!(%id, "edit started");
        self.notify(LedgerEvent::EditStarted(id));
        Ok(buffer)
    }

    /// Replaces description, amount and kind; id, date and position are kept.
    ///
    /// On a validation failure the ledger stays in edit mode.
    pub fn commit_edit(
        &mut self,
        id: MovementId,
        description: &str,
        amount: Decimal,
        kind: MovementKind,
    ) -> Result<(), LedgerError> {
        let index = self.position(id).ok_or(LedgerError::NotFound(id))?;
        let description = validate_description(description)?;
        let amount = validate_amount(amount, AmountRule::NonNegative)?;
        self.check_headroom(kind, amount, Some(index))?;

        let movement = &mut self.movements[index];
        movement.description = description;
        movement.amount = amount;
        movement.kind = kind;
        if self.editing.as_ref().is_some_and(|buffer| buffer.id == id) {
            self.editing = None;
        }

        info!(%id, %amount, kind = kind.as_str(), "movement updated");
        self.notify(LedgerEvent::MovementUpdated(id));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            debug!("edit cancelled");
            self.notify(LedgerEvent::EditCancelled);
        }
    }

    /// Drops all session data. The id counter keeps counting.
    pub fn reset(&mut self) {
        self.opening_balance = None;
        self.movements.clear();
        self.editing = None;
        info!("ledger cleared");
        self.notify(LedgerEvent::Cleared);
    }

    pub fn total_for(&self, kind: MovementKind) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.kind == kind)
            .fold(Decimal::ZERO, |total, m| total.saturating_add(m.amount))
    }

    pub fn totals(&self) -> Totals {
        let total_expenses = self.total_for(MovementKind::Expense);
        let total_income = self.total_for(MovementKind::Income);
        let opening = self.opening_balance.unwrap_or(Decimal::ZERO);

        Totals {
            total_expenses,
            total_income,
            current_balance: opening
                .saturating_add(total_income)
                .saturating_sub(total_expenses),
        }
    }

    /// Rejects `amount` when the `kind` total would no longer fit a `Decimal`.
    /// `replacing` is the index of a movement whose amount drops out first.
    fn check_headroom(
        &self,
        kind: MovementKind,
        amount: Decimal,
        replacing: Option<usize>,
    ) -> Result<(), ValidationError> {
        let total = self
            .movements
            .iter()
            .enumerate()
            .filter(|(i, m)| m.kind == kind && Some(*i) != replacing)
            .try_fold(Decimal::ZERO, |total, (_, m)| total.checked_add(m.amount));

        match total.and_then(|total| total.checked_add(amount)) {
            Some(_) => Ok(()),
            None => Err(ValidationError::AmountTooLarge),
        }
    }

    fn position(&self, id: MovementId) -> Option<usize> {
        self.movements.iter().position(|m| m.id == id)
    }
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: Decimal, rule: AmountRule) -> Result<Decimal, ValidationError> {
    if amount.is_zero() {
        return match rule {
            AmountRule::Positive => Err(ValidationError::NonPositiveAmount),
            // -0 is stored as plain zero
            AmountRule::NonNegative => Ok(Decimal::ZERO),
        };
    }
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount);
    }
    if amount > max_amount() {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount)
}
