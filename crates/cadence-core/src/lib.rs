//! Shared configuration and error types for the cadence workspace.

pub mod config;
pub mod error;

pub use config::{EngineSettings, Settings, load_config};
pub use error::{CoreError, CoreResult};
