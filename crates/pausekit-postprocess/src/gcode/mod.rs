//! Pause-at-height G-code processing
//!
//! This module provides:
//! - Token value extraction
//! - Layer height lookahead
//! - The pause trigger state machine
//! - Pause sequence generation
//! - The stream pipeline tying them together

pub mod emitter;
pub mod lookahead;
pub mod pipeline;
pub mod token;
pub mod trigger;

pub use emitter::*;
pub use lookahead::*;
pub use pipeline::*;
pub use token::*;
pub use trigger::*;
