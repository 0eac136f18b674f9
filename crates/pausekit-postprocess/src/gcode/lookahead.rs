//! Layer height lookahead
//!
//! Slicers place a Z positioning line shortly after a layer marker and
//! before the first XY move of that layer. Scanning a small window of
//! upcoming lines is enough to learn the height the layer prints at.

use super::token::{extract_value, extract_value_or};

/// Number of lines inspected from a layer marker, the marker included
pub const LOOKAHEAD_LINES: usize = 20;

/// Seed height used before any layer has been scanned
pub const UNKNOWN_Z: f64 = -1.0;

/// Finds the print height of an upcoming layer
#[derive(Debug, Clone, Default)]
pub struct LayerLookahead {
    last_z: Option<f64>,
}

impl LayerLookahead {
    /// Create a scanner with no previous result
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the most recent scan
    pub fn last_z(&self) -> Option<f64> {
        self.last_z
    }

    /// Scan `window` for the Z of the first `G1` move that carries X or Y.
    ///
    /// Only the first [`LOOKAHEAD_LINES`] lines are inspected. When no such
    /// move shows up, the last Z seen is returned, starting from the previous
    /// scan's result.
    pub fn scan<I, S>(&mut self, window: I) -> f64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut z = self.last_z.unwrap_or(UNKNOWN_Z);

        for line in window.into_iter().take(LOOKAHEAD_LINES) {
            let line = line.as_ref();
            z = extract_value_or(line, 'Z', z);
            if is_print_move(line) {
                break;
            }
        }

        self.last_z = Some(z);
        z
    }
}

fn is_print_move(line: &str) -> bool {
    line.starts_with("G1 ")
        && (extract_value(line, 'X').is_some() || extract_value(line, 'Y').is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_z_before_first_xy_move() {
        let window = [
            ";LAYER:1",
            "M106 S255",
            "G0 F7200 Z0.4",
            "G1 X10 Y10 E1",
            "G0 Z0.8",
        ];
        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan(window), 0.4);
    }

    #[test]
    fn test_z_on_the_move_itself_counts() {
        let window = [";LAYER:2", "G1 X5 Y5 Z0.6 E0.1", "G1 Z9"];
        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan(window), 0.6);
    }

    #[test]
    fn test_g0_xy_moves_do_not_stop_the_scan() {
        let window = [";LAYER:2", "G0 X1 Y1 Z0.4", "G0 Z0.6", "G1 X2 Y2 E1"];
        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan(window), 0.6);
    }

    #[test]
    fn test_without_move_returns_last_seen_z() {
        let window = [";LAYER:0", "G0 Z0.3", "M107"];
        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan(window), 0.3);
    }

    #[test]
    fn test_seed_is_previous_result() {
        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan([";LAYER:0", "M107"]), UNKNOWN_Z);

        scanner.scan([";LAYER:0", "G0 Z0.2", "G1 X1 Y1"]);
        assert_eq!(scanner.scan([";LAYER:1", "G1 X2 Y2 E1"]), 0.2);
        assert_eq!(scanner.last_z(), Some(0.2));
    }

    #[test]
    fn test_window_is_bounded() {
        let mut lines = vec![";LAYER:5".to_string()];
        lines.extend((0..LOOKAHEAD_LINES).map(|_| "M105".to_string()));
        lines.push("G0 Z3.0".to_string());
        lines.push("G1 X1 Y1".to_string());

        let mut scanner = LayerLookahead::new();
        assert_eq!(scanner.scan(&lines), UNKNOWN_Z);
    }
}
