use std::fs;

use expense_tracker::config::{Config, ConfigError};
use expense_tracker::models::aggregate::MonthLocale;
use expense_tracker::ui::theme::Theme;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();

    let config = Config::load(&dir.path().join("absent.json")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.theme, Theme::Dark);
    assert_eq!(config.currency_symbol, "$");
}

#[test]
fn save_then_load_keeps_preferences() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = Config {
        theme: Theme::Light,
        currency_symbol: "€".into(),
        month_locale: MonthLocale::Spanish,
        grouping_separator: ',',
        decimal_separator: '.',
        log_file: Some(dir.path().join("tracker.log")),
    };

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "theme": "light" }"#).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.theme, Theme::Light);
    assert_eq!(config.month_locale, MonthLocale::English);
    assert_eq!(config.grouping_separator, '.');
}

#[test]
fn identical_separators_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "grouping_separator": ",", "decimal_separator": "," }"#,
    )
    .unwrap();

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ theme: ").unwrap();

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn explicit_path_wins_over_defaults() {
    let dir = tempdir().unwrap();
    let explicit = dir.path().join("mine.json");

    assert_eq!(Config::resolve_path(Some(explicit.clone())), Some(explicit));
}
