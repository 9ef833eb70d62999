pub mod amount;
pub mod format;
pub mod logging;
