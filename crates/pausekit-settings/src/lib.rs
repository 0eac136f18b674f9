//! PauseKit Settings Crate
//!
//! Handles the pause configuration file: loading and saving it as TOML or
//! JSON, validating it, and turning it into the [`PauseConfig`] record a
//! rewrite pass runs against.
//!
//! [`PauseConfig`]: pausekit_core::PauseConfig

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, MachineSettings, PauseSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
