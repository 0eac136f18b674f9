//! Data model shared by a rewrite pass
//!
//! [`Position`] is the last known print head location tracked while the
//! stream is scanned. [`PauseConfig`] is the fixed record describing where
//! and how the pause happens; it is assembled once per run from settings and
//! the machine profile.

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// Default pause height (mm)
pub const DEFAULT_PAUSE_HEIGHT: f64 = 5.0;
/// Default park duration (s)
pub const DEFAULT_PARK_DURATION_SECS: u32 = 60;
/// Default park X coordinate (mm)
pub const DEFAULT_PARK_X: f64 = 0.0;
/// Default park Y coordinate (mm)
pub const DEFAULT_PARK_Y: f64 = 0.0;
/// Default additional Z raise (mm)
pub const DEFAULT_MOVE_Z: f64 = 0.0;
/// Default filament retraction (mm)
pub const DEFAULT_RETRACT_AMOUNT: f64 = 5.0;
/// Build height assumed when no machine profile is available (mm)
pub const DEFAULT_MACHINE_HEIGHT: f64 = 200.0;

/// Print head position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same XY location at a different height
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X{:.3} Y{:.3} Z{:.3}", self.x, self.y, self.z)
    }
}

/// Pause parameters for one rewrite pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseConfig {
    /// Layer height at or above which the pause fires (mm)
    pub pause_height: f64,
    /// Dwell time while parked (s)
    pub park_duration_secs: u32,
    /// Park X coordinate (mm)
    pub park_x: f64,
    /// Park Y coordinate (mm)
    pub park_y: f64,
    /// Additional Z raise before parking (mm)
    pub move_z: f64,
    /// Filament retraction amount (mm)
    pub retract_amount: f64,
    /// Maximum build height of the machine (mm)
    pub max_machine_height: f64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            pause_height: DEFAULT_PAUSE_HEIGHT,
            park_duration_secs: DEFAULT_PARK_DURATION_SECS,
            park_x: DEFAULT_PARK_X,
            park_y: DEFAULT_PARK_Y,
            move_z: DEFAULT_MOVE_Z,
            retract_amount: DEFAULT_RETRACT_AMOUNT,
            max_machine_height: DEFAULT_MACHINE_HEIGHT,
        }
    }
}

impl PauseConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause height
    pub fn with_pause_height(mut self, height: f64) -> Self {
        self.pause_height = height;
        self
    }

    /// Set the park position
    pub fn with_park_position(mut self, x: f64, y: f64) -> Self {
        self.park_x = x;
        self.park_y = y;
        self
    }

    /// Set the additional Z raise
    pub fn with_move_z(mut self, move_z: f64) -> Self {
        self.move_z = move_z;
        self
    }

    /// Set the machine build height
    pub fn with_max_machine_height(mut self, height: f64) -> Self {
        self.max_machine_height = height;
        self
    }

    /// Reject values that cannot produce meaningful G-code.
    ///
    /// Raise targets beyond the machine height are not an error: the emitter
    /// clamps them.
    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("pause_height", self.pause_height),
            ("park_x", self.park_x),
            ("park_y", self.park_y),
            ("move_z", self.move_z),
            ("retract_amount", self.retract_amount),
            ("max_machine_height", self.max_machine_height),
        ];
        for (param, value) in numbers {
            if !value.is_finite() {
                return Err(invalid(param, "must be a finite number"));
            }
        }

        if self.retract_amount < 0.0 {
            return Err(invalid("retract_amount", "must not be negative"));
        }

        if self.max_machine_height <= 0.0 {
            return Err(invalid("max_machine_height", "must be > 0"));
        }

        Ok(())
    }
}

fn invalid(param: &str, reason: &str) -> crate::Error {
    GcodeError::InvalidParameter {
        param: param.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
