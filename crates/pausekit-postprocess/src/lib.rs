//! # PauseKit Post-Processor
//!
//! Rewrites a slicer's G-code so the printer pauses at a configured height.
//!
//! The pass is a line scanner:
//! - [`gcode::token`] pulls key/value tokens out of single lines
//! - [`gcode::lookahead`] finds the Z height a layer will print at
//! - [`gcode::trigger`] decides the one line the pause is injected before
//! - [`gcode::emitter`] produces the retract/park/dwell/prime/resume block
//! - [`gcode::pipeline`] drives the above over a whole stream
//!
//! [`utils::file_io`] wraps reading and atomically writing G-code files.

pub mod gcode;
pub mod utils;

pub use gcode::{
    extract_value, extract_value_or, is_comment, is_linear_move, parse_layer_marker, Injection,
    LayerLookahead, LayerMarker, PauseSequence, PauseSequenceEmitter, PauseState,
    PauseTriggerStateMachine, PausePipeline, PipelineReport, LOOKAHEAD_LINES,
};
pub use utils::file_io::{write_atomically, GcodeFileReader, GcodeFileWriter};
