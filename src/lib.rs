pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

// Re-export commonly used items
pub use config::{Config, ConfigError};
pub use error::{LedgerError, ValidationError};
pub use models::aggregate::{
    CategorySplit, MonthLocale, MonthTotals, aggregate_by_month, category_split,
};
pub use models::ledger::{Ledger, LedgerEvent, Totals};
pub use models::movement::{Movement, MovementId, MovementKind};
pub use session::auth::{Auth, AuthError, User};
pub use ui::app::App;
