//! Token value extraction
//!
//! Slicer output is line oriented: a command token followed by
//! key-letter/value pairs, optionally followed by a `;` comment. Values are
//! looked up by the first occurrence of their key letter; anything at or
//! after the comment marker is ignored.

use regex::Regex;

/// Marker that starts a comment or metadata line
pub const COMMENT_MARKER: char = ';';

/// Prefix of the layer boundary comment emitted by the slicer
pub const LAYER_MARKER_PREFIX: &str = ";LAYER:";

fn number_regex() -> &'static Regex {
    static NUMBER_REGEX: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    NUMBER_REGEX.get_or_init(|| Regex::new(r"^[0-9]+\.?[0-9]*").expect("invalid regex pattern"))
}

/// Extract the unsigned number following the first occurrence of `key`.
///
/// Returns `None` when the key is missing, sits inside the trailing comment,
/// or is not followed by a parseable number.
pub fn extract_value(line: &str, key: char) -> Option<f64> {
    let key_pos = line.find(key)?;

    if let Some(comment_pos) = line.find(COMMENT_MARKER) {
        if key_pos >= comment_pos {
            return None;
        }
    }

    let rest = &line[key_pos + key.len_utf8()..];
    let matched = number_regex().find(rest)?;
    matched.as_str().parse::<f64>().ok()
}

/// Like [`extract_value`], falling back to `default` when the value is absent.
pub fn extract_value_or(line: &str, key: char, default: f64) -> f64 {
    extract_value(line, key).unwrap_or(default)
}

/// Whether the line is a comment/metadata line
pub fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER)
}

/// Whether the line is a basic linear move (`G0` or `G1`)
pub fn is_linear_move(line: &str) -> bool {
    matches!(extract_value(line, 'G'), Some(g) if g == 0.0 || g == 1.0)
}

/// Layer boundary parsed from a `;LAYER:<n>` comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMarker {
    /// Layer index; rafts are numbered below zero
    pub index: i64,
}

/// Parse a layer boundary marker.
///
/// A marker whose index does not parse is not a marker.
pub fn parse_layer_marker(line: &str) -> Option<LayerMarker> {
    let index = line
        .strip_prefix(LAYER_MARKER_PREFIX)?
        .trim()
        .parse::<i64>()
        .ok()?;
    Some(LayerMarker { index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_simple_values() {
        let line = "G1 X10.5 Y20 Z0.3 E1.25";
        assert_eq!(extract_value(line, 'X'), Some(10.5));
        assert_eq!(extract_value(line, 'Y'), Some(20.0));
        assert_eq!(extract_value(line, 'Z'), Some(0.3));
        assert_eq!(extract_value(line, 'G'), Some(1.0));
        assert_eq!(extract_value(line, 'F'), None);
    }

    #[test]
    fn test_trailing_decimal_point() {
        assert_eq!(extract_value("G1 Z5.", 'Z'), Some(5.0));
    }

    #[test]
    fn test_ignores_values_in_comments() {
        assert_eq!(extract_value("G1 X5 ; move Z10", 'Z'), None);
        assert_eq!(extract_value_or(";Z10", 'Z', -1.0), -1.0);
        assert_eq!(extract_value("G1 Z2 ; Z10", 'Z'), Some(2.0));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        assert_eq!(extract_value("G1 X-5", 'X'), None);
        assert_eq!(extract_value("G1 X.5", 'X'), None);
        assert_eq!(extract_value("G1 Xabc", 'X'), None);
        assert_eq!(extract_value_or("G1 X", 'X', 7.0), 7.0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        // The first X belongs to a word, so the value is absent.
        assert_eq!(extract_value("M117 Xmas X10", 'X'), None);
    }

    #[test]
    fn test_line_terminators_do_not_matter() {
        assert_eq!(extract_value("G1 X12.5\r\n", 'X'), Some(12.5));
    }

    #[test]
    fn test_linear_move_detection() {
        assert!(is_linear_move("G0 X1 Y1"));
        assert!(is_linear_move("G1 F1200 X1"));
        assert!(!is_linear_move("G28"));
        assert!(!is_linear_move("G10"));
        assert!(!is_linear_move("M104 S200"));
        assert!(!is_linear_move("; G1 X1"));
    }

    #[test]
    fn test_layer_marker() {
        assert_eq!(parse_layer_marker(";LAYER:3\n"), Some(LayerMarker { index: 3 }));
        assert_eq!(parse_layer_marker(";LAYER:-2"), Some(LayerMarker { index: -2 }));
        assert_eq!(parse_layer_marker(";LAYER:abc"), None);
        assert_eq!(parse_layer_marker(";LAYER_COUNT:10"), None);
        assert_eq!(parse_layer_marker("G1 X1"), None);
    }

    #[test]
    fn test_comment_detection() {
        assert!(is_comment(";TYPE:WALL-OUTER"));
        assert!(!is_comment("G1 X1 ; trailing"));
        assert!(!is_comment(""));
    }
}
