//! Error handling for PauseKit
//!
//! The rewrite pass itself never fails on malformed G-code: bad tokens and
//! missing layer context degrade to best-effort defaults. The errors here
//! cover the collaborators around it:
//! - G-Code errors (file access, invalid pause parameters)
//! - I/O errors (unreadable input, unwritable output)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors related to G-Code files and the parameters a
/// post-processing pass is configured with.
#[derive(Error, Debug, Clone)]
pub enum GcodeError {
    /// Invalid parameter value
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },

    /// File parsing error
    #[error("File error: {reason}")]
    FileError {
        /// The reason for the file error.
        reason: String,
    },
}

/// Main error type for PauseKit
///
/// A unified error type used in public APIs of the processing crates.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
