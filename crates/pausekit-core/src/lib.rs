//! # PauseKit Core
//!
//! Core types shared by the PauseKit crates: the error taxonomy, the
//! tracked print head [`Position`] and the immutable [`PauseConfig`]
//! record a rewrite pass runs against.

pub mod data;
pub mod error;

pub use data::{
    PauseConfig, Position, DEFAULT_MACHINE_HEIGHT, DEFAULT_MOVE_Z, DEFAULT_PARK_DURATION_SECS,
    DEFAULT_PARK_X, DEFAULT_PARK_Y, DEFAULT_PAUSE_HEIGHT, DEFAULT_RETRACT_AMOUNT,
};
pub use error::{Error, GcodeError, Result};
