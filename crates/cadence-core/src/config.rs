use anyhow::Result;
use chrono::Weekday;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Accepted-occurrence cap applied when a rule does not set its own.
pub const DEFAULT_MAX_ITERATIONS: u32 = 999;

/// Years added to the series start when a rule has no until date.
pub const DEFAULT_FALLBACK_HORIZON_YEARS: u32 = 99;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
}

/// Defaults applied to every recurrence calculation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    pub max_iterations: u32,
    pub first_day_of_week: Weekday,
    pub default_timezone: String,
    pub fallback_horizon_years: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            first_day_of_week: Weekday::Mon,
            default_timezone: "UTC".to_string(),
            fallback_horizon_years: DEFAULT_FALLBACK_HORIZON_YEARS,
        }
    }
}

impl EngineSettings {
    /// ## Summary
    /// Checks that the caps are usable for a calculation.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if either cap is zero or the default
    /// timezone is blank.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_iterations == 0 {
            return Err(CoreError::ConfigError(
                "engine.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.fallback_horizon_years == 0 {
            return Err(CoreError::ConfigError(
                "engine.fallback_horizon_years must be at least 1".to_string(),
            ));
        }
        if self.default_timezone.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "engine.default_timezone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `cadence.toml` into a `Settings`.
    /// Environment variables (`CADENCE_ENGINE__MAX_ITERATIONS`, ...) take
    /// precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the engine settings fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("engine.max_iterations", i64::from(DEFAULT_MAX_ITERATIONS))?
            .set_default("engine.first_day_of_week", "Monday")?
            .set_default("engine.default_timezone", "UTC")?
            .set_default(
                "engine.fallback_horizon_years",
                i64::from(DEFAULT_FALLBACK_HORIZON_YEARS),
            )?
            // TOML file
            .add_source(config::File::with_name("cadence.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("CADENCE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.engine.validate()?;
        tracing::debug!(engine = ?settings.engine, "Engine settings loaded");

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
