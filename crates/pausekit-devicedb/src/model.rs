use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProfileError, ProfileResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DeviceType {
    #[default]
    ThreeDPrinter,
    Other,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeDPrinter => write!(f, "3D Printer"),
            Self::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
    pub enabled: bool,
}

impl AxisLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            enabled: true,
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self::new(0.0, 200.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub device_type: DeviceType,

    // Build volume
    pub x_axis: AxisLimits,
    pub y_axis: AxisLimits,
    pub z_axis: AxisLimits,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "New Printer".to_string(),
            description: String::new(),
            device_type: DeviceType::default(),
            x_axis: AxisLimits::default(),
            y_axis: AxisLimits::default(),
            z_axis: AxisLimits::default(),
        }
    }
}

impl DeviceProfile {
    /// Create a profile with a fresh id and the given build volume
    pub fn new(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            x_axis: AxisLimits::new(0.0, x),
            y_axis: AxisLimits::new(0.0, y),
            z_axis: AxisLimits::new(0.0, z),
            ..Self::default()
        }
    }

    /// Highest reachable Z, used as the machine height for pause lifts
    pub fn machine_height(&self) -> f64 {
        self.z_axis.max
    }

    /// Whether `key` names this profile, by id or by name ignoring case
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name.eq_ignore_ascii_case(key)
    }

    pub fn validate(&self) -> ProfileResult<()> {
        if self.id.trim().is_empty() {
            return Err(ProfileError::MissingField("id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("name".to_string()));
        }

        for (axis, limits) in [("X", self.x_axis), ("Y", self.y_axis), ("Z", self.z_axis)] {
            if !limits.min.is_finite() || !limits.max.is_finite() {
                return Err(ProfileError::InvalidAxisLimit {
                    axis: axis.to_string(),
                    reason: "limits must be finite".to_string(),
                });
            }
            if limits.max <= limits.min {
                return Err(ProfileError::InvalidAxisLimit {
                    axis: axis.to_string(),
                    reason: format!("max {} not above min {}", limits.max, limits.min),
                });
            }
        }

        Ok(())
    }
}
