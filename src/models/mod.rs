pub mod aggregate;
pub mod clock;
pub mod ledger;
pub mod movement;
