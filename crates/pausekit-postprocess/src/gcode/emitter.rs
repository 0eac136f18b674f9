//! Pause sequence generation
//!
//! Produces the block inserted in front of the first move of the pause
//! layer: retract, lift, park, release the extruder, dwell, prime, return
//! and resume.

use pausekit_core::{PauseConfig, Position};

/// Height the nozzle is lifted to at minimum before parking (mm)
///
/// Keeps the nozzle clear of the glass clips on the build plate.
pub const CLEARANCE_Z: f64 = 15.0;

/// Distance kept below the machine's maximum height (mm)
pub const TOP_SAFETY_MARGIN: f64 = 10.0;

/// Feed rate for extruder moves (mm/min)
pub const RETRACT_FEED_RATE: u32 = 6000;

/// Feed rate for the Z lift (mm/min)
pub const LIFT_FEED_RATE: u32 = 300;

/// Feed rate for head travel (mm/min)
pub const TRAVEL_FEED_RATE: u32 = 9000;

/// Marker opening the injected block
pub const CUSTOM_SECTION_MARKER: &str = ";TYPE:CUSTOM";

/// Generated pause block
#[derive(Debug, Clone, PartialEq)]
pub struct PauseSequence {
    /// Instruction lines, without terminators
    pub lines: Vec<String>,
    /// Height the nozzle was lifted to, if it was lifted
    pub lifted_to: Option<f64>,
}

impl PauseSequence {
    /// Whether the sequence moves Z
    pub fn z_changed(&self) -> bool {
        self.lifted_to.is_some()
    }

    /// Number of lines in the block
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the block is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append the block to `out`, ending every line with `line_ending`
    pub fn write_to(&self, out: &mut String, line_ending: &str) {
        for line in &self.lines {
            out.push_str(line);
            out.push_str(line_ending);
        }
    }
}

/// Generator for the pause block
#[derive(Debug, Clone)]
pub struct PauseSequenceEmitter {
    config: PauseConfig,
}

impl PauseSequenceEmitter {
    /// Create a new emitter with the given configuration
    pub fn new(config: PauseConfig) -> Self {
        Self { config }
    }

    /// Configuration the emitter was created with
    pub fn config(&self) -> &PauseConfig {
        &self.config
    }

    /// Height to lift to before parking, if any.
    ///
    /// Below the clearance height the nozzle always goes to
    /// [`CLEARANCE_Z`]. Above it, a positive `move_z` lifts by that amount,
    /// capped at [`TOP_SAFETY_MARGIN`] below the machine height, and only
    /// ever upwards.
    pub fn lift_target(&self, z: f64) -> Option<f64> {
        self.lift(z).map(Lift::target)
    }

    fn lift(&self, z: f64) -> Option<Lift> {
        let c = &self.config;

        if z + c.move_z < CLEARANCE_Z {
            return Some(Lift::Clearance);
        }

        if c.move_z > 0.0 {
            let max_z = c.max_machine_height - TOP_SAFETY_MARGIN;
            let new_z = (z + c.move_z).min(max_z);
            if new_z > z {
                return Some(Lift::Raise(new_z));
            }
        }

        None
    }

    /// Generate the pause block for a pause at `position`
    pub fn emit(&self, position: Position) -> PauseSequence {
        let c = &self.config;
        let retract = fmt_mm(c.retract_amount);
        let mut lines = Vec::with_capacity(14);

        lines.push(CUSTOM_SECTION_MARKER.to_string());
        lines.push("M83".to_string());
        lines.push(format!("G1 E-{} F{}", retract, RETRACT_FEED_RATE));

        let lift = self.lift(position.z);
        match lift {
            Some(Lift::Clearance) => {
                lines.push(format!("G1 Z{} F{}", CLEARANCE_Z, LIFT_FEED_RATE));
            }
            Some(Lift::Raise(z)) => {
                lines.push(format!("G1 Z{} F{}", fmt_mm(z), LIFT_FEED_RATE));
            }
            None => {}
        }

        lines.push(";PAUSING PRINT".to_string());
        lines.push(format!(
            "G1 X{} Y{} F{}",
            fmt_mm(c.park_x),
            fmt_mm(c.park_y),
            TRAVEL_FEED_RATE
        ));

        // Release the extruder so the filament can be pulled by hand
        lines.push("M84 E0".to_string());
        lines.push(format!("G4 P{}", u64::from(c.park_duration_secs) * 1000));

        // Push and pull once to prime after a filament change
        lines.push(format!("G1 E{} F{}", retract, RETRACT_FEED_RATE));
        lines.push(format!("G1 E-{} F{}", retract, RETRACT_FEED_RATE));

        if lift.is_some() {
            lines.push(format!(
                "G1 X{} Y{} Z{} F{}",
                fmt_mm(position.x),
                fmt_mm(position.y),
                fmt_mm(position.z),
                TRAVEL_FEED_RATE
            ));
        } else {
            lines.push(format!(
                "G1 X{} Y{} F{}",
                fmt_mm(position.x),
                fmt_mm(position.y),
                TRAVEL_FEED_RATE
            ));
        }

        lines.push(format!("G1 E{} F{}", retract, RETRACT_FEED_RATE));
        lines.push(format!("G1 F{}", TRAVEL_FEED_RATE));
        lines.push("M82".to_string());

        PauseSequence {
            lines,
            lifted_to: lift.map(Lift::target),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Lift {
    Clearance,
    Raise(f64),
}

impl Lift {
    fn target(self) -> f64 {
        match self {
            Lift::Clearance => CLEARANCE_Z,
            Lift::Raise(z) => z,
        }
    }
}

fn fmt_mm(value: f64) -> String {
    format!("{:.6}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(config: PauseConfig) -> PauseSequenceEmitter {
        PauseSequenceEmitter::new(config)
    }

    #[test]
    fn test_low_pause_lifts_to_clearance() {
        let config = PauseConfig::new().with_park_position(10.0, 20.0);
        let seq = emitter(config).emit(Position::new(50.0, 60.0, 0.6));

        assert_eq!(
            seq.lines,
            vec![
                ";TYPE:CUSTOM",
                "M83",
                "G1 E-5.000000 F6000",
                "G1 Z15 F300",
                ";PAUSING PRINT",
                "G1 X10.000000 Y20.000000 F9000",
                "M84 E0",
                "G4 P60000",
                "G1 E5.000000 F6000",
                "G1 E-5.000000 F6000",
                "G1 X50.000000 Y60.000000 Z0.600000 F9000",
                "G1 E5.000000 F6000",
                "G1 F9000",
                "M82",
            ]
        );
        assert_eq!(seq.lifted_to, Some(CLEARANCE_Z));
        assert!(seq.z_changed());
    }

    #[test]
    fn test_no_lift_when_high_and_no_move_z() {
        let seq = emitter(PauseConfig::default()).emit(Position::new(1.0, 2.0, 20.0));

        assert!(!seq.z_changed());
        assert_eq!(seq.len(), 13);
        assert!(!seq.lines.iter().any(|l| l.starts_with("G1 Z")));
        assert!(seq.lines.contains(&"G1 X1.000000 Y2.000000 F9000".to_string()));
        assert!(seq.lines.contains(&"G1 X0.000000 Y0.000000 F9000".to_string()));
    }

    #[test]
    fn test_move_z_raise() {
        let config = PauseConfig::new().with_move_z(5.0);
        let seq = emitter(config).emit(Position::new(0.0, 0.0, 20.0));

        assert_eq!(seq.lifted_to, Some(25.0));
        assert!(seq.lines.contains(&"G1 Z25.000000 F300".to_string()));
        assert!(seq
            .lines
            .contains(&"G1 X0.000000 Y0.000000 Z20.000000 F9000".to_string()));
    }

    #[test]
    fn test_raise_is_clamped_below_machine_height() {
        let config = PauseConfig::new()
            .with_move_z(50.0)
            .with_max_machine_height(100.0);
        let e = emitter(config);

        assert_eq!(e.lift_target(70.0), Some(90.0));
        // Already above the clamp: never move down
        assert_eq!(e.lift_target(95.0), None);
        assert_eq!(e.lift_target(90.0), None);
    }

    #[test]
    fn test_raise_landing_on_clearance_height_keeps_precision() {
        let config = PauseConfig::new().with_move_z(5.0);
        let seq = emitter(config).emit(Position::new(0.0, 0.0, 10.0));
        assert!(seq.lines.contains(&"G1 Z15.000000 F300".to_string()));
    }

    #[test]
    fn test_clearance_branch_wins_over_move_z() {
        let config = PauseConfig::new().with_move_z(2.0);
        assert_eq!(emitter(config).lift_target(10.0), Some(CLEARANCE_Z));
    }

    #[test]
    fn test_dwell_uses_milliseconds() {
        let config = PauseConfig {
            park_duration_secs: 5,
            ..PauseConfig::default()
        };
        let seq = emitter(config).emit(Position::new(0.0, 0.0, 30.0));
        assert!(seq.lines.contains(&"G4 P5000".to_string()));
    }

    #[test]
    fn test_write_to_uses_line_ending() {
        let seq = emitter(PauseConfig::default()).emit(Position::new(0.0, 0.0, 30.0));
        let mut out = String::new();
        seq.write_to(&mut out, "\r\n");
        assert_eq!(out.matches("\r\n").count(), seq.len());
        assert!(out.starts_with(";TYPE:CUSTOM\r\nM83\r\n"));
    }
}
