use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_DIRECTIVE: &str = "expense_tracker=info";

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber, appending to `log_file`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(log_file: &Path) -> io::Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // Another subscriber may already be installed (tests); keep it.
        let _ = fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
    Ok(())
}
