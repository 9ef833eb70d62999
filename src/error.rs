use thiserror::Error;

use crate::models::movement::MovementId;

/// Input rejected before it reaches the ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Amount must not be negative")]
    NegativeAmount,
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Amount is too large")]
    AmountTooLarge,
    #[error("Unknown movement kind: '{0}'")]
    InvalidKind(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Movement not found: {0}")]
    NotFound(MovementId),
}
