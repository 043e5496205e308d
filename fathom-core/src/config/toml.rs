//! Minimal TOML loader for rangefinder parameters
//!
//! Handles only the subset needed for parameter files. It does NOT support
//! the full TOML grammar.
//!
//! Supported features:
//! - `[rangefinder.N]` section headers, N is the 1-based slot
//! - `KEY = value` pairs where KEY is a schema name (case-insensitive)
//! - Integer and float values, booleans for the Int8 flags
//! - Comments (# ...)
//!
//! Example:
//!
//! ```toml
//! [rangefinder.1]
//! TYPE = 1
//! PIN = 26
//! FUNCTION = 2      # hyperbolic
//! SCALING = 0.8
//! RMETRIC = false
//! ```
//!
//! Fields a file does not mention keep their defaults. No allocation.

use heapless::String;

use super::params::{RangefinderParams, MAX_RANGEFINDERS};
use super::schema::{find_param, ParamError, ParamKind, ParamValue};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Key = value outside a `[rangefinder.N]` section
    OutsideSection,
    /// Line is neither a header, a comment nor `key = value`
    InvalidLine,
    /// Key is not a parameter name
    UnknownKey,
    /// Value is not an integer, float or boolean
    InvalidValue,
    /// Value rejected by the parameter schema
    Param(ParamError),
}

impl From<ParamError> for ParseError {
    fn from(e: ParamError) -> Self {
        ParseError::Param(e)
    }
}

/// Parse a parameter file into one block per slot
pub fn parse_params(input: &str) -> Result<[RangefinderParams; MAX_RANGEFINDERS], ParseError> {
    let mut slots = [RangefinderParams::default(); MAX_RANGEFINDERS];
    let mut current: Option<usize> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current = Some(parse_section_header(&line[1..line.len() - 1])?);
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        let slot = current.ok_or(ParseError::OutsideSection)?;
        let info = find_param(key).ok_or(ParseError::UnknownKey)?;
        let value = parse_value(info.kind, value)?;
        slots[slot].set(info.name, value)?;
    }

    Ok(slots)
}

/// Parse "rangefinder.N" into a 0-based slot
fn parse_section_header(header: &str) -> Result<usize, ParseError> {
    let (section_type, index) = header
        .trim()
        .split_once('.')
        .ok_or(ParseError::InvalidSection)?;

    if section_type.trim() != "rangefinder" {
        return Err(ParseError::InvalidSection);
    }

    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidSection)?;
    if index == 0 || index > MAX_RANGEFINDERS {
        return Err(ParseError::InvalidSection);
    }

    Ok(index - 1)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a scalar as a value of `kind`
///
/// Integer keys take integer literals only; a float literal there is a
/// type mismatch rather than a malformed value.
fn parse_value(kind: ParamKind, value: &str) -> Result<ParamValue, ParseError> {
    match (kind, value) {
        (ParamKind::Int8, "true") => return Ok(ParamValue::Int8(1)),
        (ParamKind::Int8, "false") => return Ok(ParamValue::Int8(0)),
        (_, "true" | "false") => return Err(ParseError::InvalidValue),
        _ => {}
    }

    let digits = strip_underscores(value)?;
    match kind {
        ParamKind::Float => {
            let v: f32 = digits.parse().map_err(|_| ParseError::InvalidValue)?;
            Ok(ParamValue::from_f32(kind, v)?)
        }
        ParamKind::Int8 | ParamKind::Int16 => match digits.parse::<i32>() {
            Ok(v) => Ok(ParamValue::from_f32(kind, v as f32)?),
            Err(_) if digits.parse::<f32>().is_ok() => {
                Err(ParseError::Param(ParamError::TypeMismatch))
            }
            Err(_) => Err(ParseError::InvalidValue),
        },
    }
}

/// TOML allows `_` between digits (`7_000`)
fn strip_underscores(value: &str) -> Result<String<24>, ParseError> {
    let mut out = String::new();
    for c in value.chars().filter(|c| *c != '_') {
        out.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DistanceFunction, RangefinderType};

    #[test]
    fn test_parse_two_slots() {
        let input = r#"
# Depth sounder on the analog port
[rangefinder.1]
TYPE = 1
PIN = 26
FUNCTION = 2      # hyperbolic
SCALING = 0.8
OFFSET = 0.25
MAX_CM = 7_000
RMETRIC = false

[rangefinder.2]
type = 1
pin = 27
"#;
        let slots = parse_params(input).unwrap();

        assert_eq!(slots[0].rtype, RangefinderType::Analog);
        assert_eq!(slots[0].pin, 26);
        assert_eq!(slots[0].function, DistanceFunction::Hyperbolic);
        assert_eq!(slots[0].scaling, 0.8);
        assert_eq!(slots[0].offset, 0.25);
        assert_eq!(slots[0].max_cm, 7000);
        assert!(!slots[0].ratiometric);

        assert_eq!(slots[1].pin, 27);
        assert_eq!(slots[1].function, DistanceFunction::Linear);
        assert!(slots[1].ratiometric);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        let slots = parse_params("").unwrap();
        assert_eq!(slots, [RangefinderParams::default(); MAX_RANGEFINDERS]);
    }

    #[test]
    fn test_key_outside_section() {
        assert_eq!(parse_params("PIN = 26"), Err(ParseError::OutsideSection));
    }

    #[test]
    fn test_invalid_sections() {
        assert_eq!(parse_params("[baro.1]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_params("[rangefinder.0]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_params("[rangefinder.3]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_params("[rangefinder]"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_value_literals_follow_key_kind() {
        let input = r#"
[rangefinder.1]
RMETRIC = true
MAX_CM = 70_00
SCALING = 3
PIN = +27
"#;
        let slots = parse_params(input).unwrap();
        assert!(slots[0].ratiometric);
        assert_eq!(slots[0].max_cm, 7000);
        assert_eq!(slots[0].scaling, 3.0);
        assert_eq!(slots[0].pin, 27);
    }

    #[test]
    fn test_rejected_values() {
        let header = "[rangefinder.1]\n";

        let mut input = String::<64>::new();
        input.push_str(header).unwrap();
        input.push_str("FUNCTION = 5").unwrap();
        assert_eq!(
            parse_params(&input),
            Err(ParseError::Param(ParamError::OutOfRange))
        );

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("PIN = gpio26").unwrap();
        assert_eq!(parse_params(&input), Err(ParseError::InvalidValue));

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("PIN = 26.5").unwrap();
        assert_eq!(
            parse_params(&input),
            Err(ParseError::Param(ParamError::TypeMismatch))
        );

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("PIN = 1e1").unwrap();
        assert_eq!(
            parse_params(&input),
            Err(ParseError::Param(ParamError::TypeMismatch))
        );

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("SCALING = true").unwrap();
        assert_eq!(parse_params(&input), Err(ParseError::InvalidValue));

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("MAX_CM = false").unwrap();
        assert_eq!(parse_params(&input), Err(ParseError::InvalidValue));

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("SETTLE = 1").unwrap();
        assert_eq!(parse_params(&input), Err(ParseError::UnknownKey));

        input.clear();
        input.push_str(header).unwrap();
        input.push_str("PIN 26").unwrap();
        assert_eq!(parse_params(&input), Err(ParseError::InvalidLine));
    }
}
