//! Tests for configuration module.

use super::*;

#[test_log::test]
fn test_default_engine_settings() {
    tracing::debug!("Checking default engine settings");

    let settings = EngineSettings::default();

    assert_eq!(settings.max_iterations, 999);
    assert_eq!(settings.first_day_of_week, Weekday::Mon);
    assert_eq!(settings.default_timezone, "UTC");
    assert_eq!(settings.fallback_horizon_years, 99);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_zero_max_iterations_rejected() {
    let settings = EngineSettings {
        max_iterations: 0,
        ..EngineSettings::default()
    };

    let err = settings.validate().expect_err("zero cap must be rejected");
    assert!(err.to_string().contains("max_iterations"));
}

#[test]
fn test_zero_horizon_rejected() {
    let settings = EngineSettings {
        fallback_horizon_years: 0,
        ..EngineSettings::default()
    };

    assert!(matches!(settings.validate(), Err(CoreError::ConfigError(_))));
}

#[test]
fn test_blank_timezone_rejected() {
    let settings = EngineSettings {
        default_timezone: "  ".to_string(),
        ..EngineSettings::default()
    };

    assert!(settings.validate().is_err());
}

#[test_log::test]
fn test_load_uses_defaults() {
    let settings = Settings::load().expect("defaults should load");

    assert_eq!(settings.engine.first_day_of_week, Weekday::Mon);
    assert!(settings.engine.max_iterations >= 1);
}

#[test]
fn test_settings_debug() {
    let settings = Settings {
        engine: EngineSettings::default(),
    };

    let debug_str = format!("{settings:?}");
    assert!(debug_str.contains("Settings"));
    assert!(debug_str.contains("engine"));
    assert!(debug_str.contains("max_iterations"));
}
