use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::aggregate::MonthLocale;
use crate::ui::theme::Theme;
use crate::utils::amount::NumberFormat;

pub const CONFIG_ENV: &str = "EXPENSE_TRACKER_CONFIG";
const APP_DIR: &str = "expense-tracker";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "expense-tracker.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User preferences read at startup. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub currency_symbol: String,
    pub month_locale: MonthLocale,
    pub grouping_separator: char,
    pub decimal_separator: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let format = NumberFormat::default();
        Self {
            theme: Theme::default(),
            currency_symbol: "$".into(),
            month_locale: MonthLocale::default(),
            grouping_separator: format.grouping,
            decimal_separator: format.decimal,
            log_file: None,
        }
    }
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let separators = [self.grouping_separator, self.decimal_separator];
        if self.grouping_separator == self.decimal_separator {
            return Err(ConfigError::Invalid(format!(
                "grouping and decimal separators are both '{}'",
                self.grouping_separator
            )));
        }
        if separators.iter().any(|ch| ch.is_ascii_digit() || *ch == '-') {
            return Err(ConfigError::Invalid(
                "separators must not be digits or '-'".into(),
            ));
        }
        Ok(())
    }

    pub fn number_format(&self) -> NumberFormat {
        NumberFormat {
            grouping: self.grouping_separator,
            decimal: self.decimal_separator,
        }
    }

    /// `--config` wins over the environment, which wins over the platform config dir.
    pub fn resolve_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
        cli_path
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)))
    }

    pub fn resolve_log_file(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }

        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(APP_DIR).join(LOG_FILE)
    }
}
