//! Error types for the printer profile store.
//!
//! This module provides structured error types for profile lookup,
//! persistence, and validation.

use std::io;
use thiserror::Error;

/// Errors that can occur during profile store operations.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The requested profile was not found.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// A profile with this ID already exists.
    #[error("Profile already exists: {0}")]
    ProfileAlreadyExists(String),

    /// Failed to load profiles from storage.
    #[error("Failed to load profiles: {0}")]
    LoadError(String),

    /// Failed to save profiles to storage.
    #[error("Failed to save profiles: {0}")]
    SaveError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A profile validation error occurred.
    #[error("Validation error: {0}")]
    Validation(#[from] ProfileError),
}

/// Errors related to profile validation.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// An axis limit value is invalid.
    #[error("Invalid axis limit for {axis}: {reason}")]
    InvalidAxisLimit { axis: String, reason: String },
}

/// Result type alias for profile store operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type alias for profile validation operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::ProfileNotFound("ender-3".to_string());
        assert_eq!(err.to_string(), "Profile not found: ender-3");

        let err = DeviceError::ProfileAlreadyExists("prusa-mk4".to_string());
        assert_eq!(err.to_string(), "Profile already exists: prusa-mk4");

        let err = DeviceError::LoadError("corrupted JSON".to_string());
        assert_eq!(err.to_string(), "Failed to load profiles: corrupted JSON");
    }

    #[test]
    fn test_profile_error_display() {
        let err = ProfileError::InvalidAxisLimit {
            axis: "Z".to_string(),
            reason: "max less than min".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid axis limit for Z: max less than min"
        );

        let err = ProfileError::MissingField("name".to_string());
        assert_eq!(err.to_string(), "Missing required field: name");
    }

    #[test]
    fn test_error_conversion() {
        let profile_err = ProfileError::MissingField("name".to_string());
        let device_err: DeviceError = profile_err.into();
        assert!(matches!(device_err, DeviceError::Validation(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let device_err: DeviceError = io_err.into();
        assert!(matches!(device_err, DeviceError::IoError(_)));
    }
}
