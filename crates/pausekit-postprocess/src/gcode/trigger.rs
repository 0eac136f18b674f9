//! Pause trigger state machine
//!
//! Tracks layer boundaries and the head position while lines stream past,
//! and picks the single line the pause block is injected in front of.
//!
//! The machine starts `Idle`. A layer marker whose index is lower than the
//! previous one arms it; the very first marker always does. While armed,
//! every layer marker triggers a lookahead for that layer's print height.
//! Once the height reaches the pause height the machine is `Triggered` and
//! fires on the next `G0`/`G1`, returning to `Idle`. Only a restarted layer
//! count (the next object of a one-at-a-time print) arms it again.

use pausekit_core::{PauseConfig, Position};
use serde::Serialize;
use tracing::{debug, info};

use super::emitter::{PauseSequence, PauseSequenceEmitter};
use super::lookahead::LayerLookahead;
use super::token::{extract_value_or, is_comment, is_linear_move, parse_layer_marker};

/// Pause trigger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseState {
    /// Waiting for a layer count restart
    #[default]
    Idle,
    /// Watching layer heights for the pause height
    Armed,
    /// Pause height reached, waiting for the next move
    Triggered,
}

impl std::fmt::Display for PauseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Armed => write!(f, "armed"),
            Self::Triggered => write!(f, "triggered"),
        }
    }
}

/// One injected pause
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Injection {
    /// 1-based input line the block was inserted before
    pub line_number: usize,
    /// Position the print paused at
    pub position: Position,
    /// Height the nozzle was lifted to while parked
    pub lifted_to: Option<f64>,
}

/// Line-by-line pause trigger for one rewrite pass
#[derive(Debug, Clone)]
pub struct PauseTriggerStateMachine {
    emitter: PauseSequenceEmitter,
    lookahead: LayerLookahead,
    state: PauseState,
    position: Position,
    last_layer_index: Option<i64>,
    target_z: f64,
    line_number: usize,
    injections: Vec<Injection>,
}

impl PauseTriggerStateMachine {
    /// Create a state machine for a fresh pass
    pub fn new(config: PauseConfig) -> Self {
        Self {
            emitter: PauseSequenceEmitter::new(config),
            lookahead: LayerLookahead::new(),
            state: PauseState::Idle,
            position: Position::default(),
            last_layer_index: None,
            target_z: 0.0,
            line_number: 0,
            injections: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> PauseState {
        self.state
    }

    /// Last tracked head position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Index of the most recent layer marker
    pub fn last_layer_index(&self) -> Option<i64> {
        self.last_layer_index
    }

    /// Pauses injected so far
    pub fn injections(&self) -> &[Injection] {
        &self.injections
    }

    /// Configuration in use
    pub fn config(&self) -> &PauseConfig {
        self.emitter.config()
    }

    /// Feed one input line.
    ///
    /// `window` holds the upcoming lines starting with `line` itself; it is
    /// only read at layer markers while armed. Returns the pause block to
    /// write before `line`, if this is the injection point. `line` itself is
    /// always written unchanged by the caller.
    pub fn process_line<I, S>(&mut self, line: &str, window: I) -> Option<PauseSequence>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.line_number += 1;

        if is_comment(line) {
            self.process_comment(line, window);
            return None;
        }

        let before = self.position;
        self.position.x = extract_value_or(line, 'X', self.position.x);
        self.position.y = extract_value_or(line, 'Y', self.position.y);

        if self.state == PauseState::Triggered && is_linear_move(line) {
            return Some(self.inject(before));
        }

        None
    }

    fn process_comment<I, S>(&mut self, line: &str, window: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(marker) = parse_layer_marker(line) else {
            return;
        };

        let restarted = self
            .last_layer_index
            .is_none_or(|last| marker.index < last);
        if restarted && self.state == PauseState::Idle {
            debug!(layer = marker.index, "layer count restarted, arming pause");
            self.transition(PauseState::Armed);
        }
        self.last_layer_index = Some(marker.index);

        if self.state == PauseState::Armed {
            let layer_z = self.lookahead.scan(window);
            debug!(layer = marker.index, z = layer_z, "scanned layer height");
            if layer_z >= self.config().pause_height {
                self.target_z = layer_z;
                self.transition(PauseState::Triggered);
            }
        }
    }

    fn inject(&mut self, before: Position) -> PauseSequence {
        self.position.z = self.target_z;
        self.transition(PauseState::Idle);

        let at = before.with_z(self.target_z);
        let sequence = self.emitter.emit(at);

        info!(line = self.line_number, at = %at, "injecting pause sequence");
        self.injections.push(Injection {
            line_number: self.line_number,
            position: at,
            lifted_to: sequence.lifted_to,
        });

        sequence
    }

    fn transition(&mut self, next: PauseState) {
        debug!(from = %self.state, to = %next, line = self.line_number, "pause state");
        self.state = next;
    }
}
