//! Configuration file handling for PauseKit
//!
//! Configuration is organized into two sections:
//! - Pause settings (height, park position and dwell, lift, retraction)
//! - Machine settings (fallback build height, device profile selection)
//!
//! Files are JSON or TOML, chosen by extension. Every field has a default,
//! so a file only needs the values it changes.

use pausekit_core::{
    PauseConfig, DEFAULT_MACHINE_HEIGHT, DEFAULT_MOVE_Z, DEFAULT_PARK_DURATION_SECS,
    DEFAULT_PARK_X, DEFAULT_PARK_Y, DEFAULT_PAUSE_HEIGHT, DEFAULT_RETRACT_AMOUNT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

const CONFIG_DIR_NAME: &str = "pausekit";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Pause settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseSettings {
    /// Print height at which to pause, in mm
    pub pause_height: f64,
    /// Dwell while parked, in seconds
    pub park_duration: u32,
    /// Park X position
    pub park_x: f64,
    /// Park Y position
    pub park_y: f64,
    /// Extra head lift while parked
    pub move_z: f64,
    /// Filament retraction length
    pub retract_amount: f64,
}

impl Default for PauseSettings {
    fn default() -> Self {
        Self {
            pause_height: DEFAULT_PAUSE_HEIGHT,
            park_duration: DEFAULT_PARK_DURATION_SECS,
            park_x: DEFAULT_PARK_X,
            park_y: DEFAULT_PARK_Y,
            move_z: DEFAULT_MOVE_Z,
            retract_amount: DEFAULT_RETRACT_AMOUNT,
        }
    }
}

/// Machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Device profile id or name to take the build height from
    pub profile: Option<String>,
    /// Device profile store, a JSON file
    pub profile_store: Option<PathBuf>,
    /// Build height used when no profile is selected
    pub machine_height: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            profile: None,
            profile_store: None,
            machine_height: DEFAULT_MACHINE_HEIGHT,
        }
    }
}

/// Complete PauseKit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Pause settings
    pub pause: PauseSettings,
    /// Machine settings
    pub machine: MachineSettings,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load config from `path` if given, else from the default location if a
    /// file exists there, else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match default_config_path() {
            Ok(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let finite = [
            ("pause.pause_height", self.pause.pause_height),
            ("pause.park_x", self.pause.park_x),
            ("pause.park_y", self.pause.park_y),
            ("pause.move_z", self.pause.move_z),
            ("pause.retract_amount", self.pause.retract_amount),
            ("machine.machine_height", self.machine.machine_height),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: "must be a finite number".to_string(),
                });
            }
        }

        if self.pause.retract_amount < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "pause.retract_amount".to_string(),
                value: self.pause.retract_amount.to_string(),
            }
            .into());
        }

        if self.machine.machine_height <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "machine.machine_height".to_string(),
                value: self.machine.machine_height.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Build the pause record for a machine of the given build height
    pub fn to_pause_config(&self, max_machine_height: f64) -> PauseConfig {
        PauseConfig {
            pause_height: self.pause.pause_height,
            park_duration_secs: self.pause.park_duration,
            park_x: self.pause.park_x,
            park_y: self.pause.park_y,
            move_z: self.pause.move_z,
            retract_amount: self.pause.retract_amount,
            max_machine_height,
        }
    }
}

/// Default configuration file location
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
    })?;
    Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.pause.pause_height, 5.0);
        assert_eq!(config.pause.park_duration, 60);
        assert_eq!(config.pause.retract_amount, 5.0);
        assert_eq!(config.machine.machine_height, 200.0);
        assert!(config.machine.profile.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[pause]\npause_height = 12.5\n").unwrap();
        assert_eq!(config.pause.pause_height, 12.5);
        assert_eq!(config.pause.park_duration, 60);
        assert_eq!(config.machine, MachineSettings::default());
    }

    #[test]
    fn test_validate_rejects_negative_retract() {
        let mut config = Config::new();
        config.pause.retract_amount = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut config = Config::new();
        config.pause.park_x = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pause.park_x"));
    }

    #[test]
    fn test_validate_rejects_flat_machine() {
        let mut config = Config::new();
        config.machine.machine_height = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_pause_config() {
        let mut config = Config::new();
        config.pause.pause_height = 42.0;
        config.pause.park_duration = 90;
        config.pause.park_x = 190.0;

        let pause = config.to_pause_config(250.0);
        assert_eq!(pause.pause_height, 42.0);
        assert_eq!(pause.park_duration_secs, 90);
        assert_eq!(pause.park_x, 190.0);
        assert_eq!(pause.max_machine_height, 250.0);
    }

    #[test]
    fn test_default_config_path_file_name() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("pausekit/config.toml"));
        }
    }
}
