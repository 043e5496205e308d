//! Parameter schema
//!
//! A plain table of `(name, index, kind, default, range)` rows describing
//! every field of [`RangefinderParams`]. Configuration tooling (the TOML
//! loader, a ground station bridge) addresses fields only through this
//! table and the by-name accessors below.

use core::fmt::Write;

use heapless::String;

use super::params::{DistanceFunction, RangefinderParams, RangefinderType, MAX_RANGEFINDERS};

/// Prefix of externally visible parameter names (`RNGFND1_PIN`)
pub const PARAM_PREFIX: &str = "RNGFND";

/// Longest full parameter name
pub const MAX_PARAM_NAME_LEN: usize = 16;

/// Errors from by-name parameter access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// No parameter with this name
    UnknownName,
    /// Value cannot be represented in the parameter's type
    TypeMismatch,
    /// Value outside the parameter's valid range
    OutOfRange,
    /// Slot index past `MAX_RANGEFINDERS`
    InvalidSlot,
}

/// Storage type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamKind {
    Int8,
    Int16,
    Float,
}

/// A typed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamValue {
    Int8(i8),
    Int16(i16),
    Float(f32),
}

impl ParamValue {
    /// Storage type of this value
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int8(_) => ParamKind::Int8,
            ParamValue::Int16(_) => ParamKind::Int16,
            ParamValue::Float(_) => ParamKind::Float,
        }
    }

    /// Float encoding, as carried by MAVLink parameter messages
    pub fn as_f32(&self) -> f32 {
        match *self {
            ParamValue::Int8(v) => f32::from(v),
            ParamValue::Int16(v) => f32::from(v),
            ParamValue::Float(v) => v,
        }
    }

    /// Decode a float-encoded value into `kind`
    ///
    /// Integer kinds only accept whole numbers inside the type's bounds.
    pub fn from_f32(kind: ParamKind, value: f32) -> Result<Self, ParamError> {
        match kind {
            ParamKind::Float => {
                if value.is_finite() {
                    Ok(ParamValue::Float(value))
                } else {
                    Err(ParamError::TypeMismatch)
                }
            }
            ParamKind::Int8 => {
                if !is_whole(value) || value < f32::from(i8::MIN) || value > f32::from(i8::MAX) {
                    return Err(ParamError::TypeMismatch);
                }
                Ok(ParamValue::Int8(value as i8))
            }
            ParamKind::Int16 => {
                if !is_whole(value) || value < f32::from(i16::MIN) || value > f32::from(i16::MAX) {
                    return Err(ParamError::TypeMismatch);
                }
                Ok(ParamValue::Int16(value as i16))
            }
        }
    }

    /// Convert to `kind`, going through the float encoding
    pub fn coerce(self, kind: ParamKind) -> Result<Self, ParamError> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Self::from_f32(kind, self.as_f32())
        }
    }
}

fn is_whole(value: f32) -> bool {
    value.is_finite() && (value - (value as i32) as f32) == 0.0
}

/// One schema row
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamInfo {
    /// Group-relative name (`PIN`)
    pub name: &'static str,
    /// Stable storage index
    pub index: u8,
    /// Storage type
    pub kind: ParamKind,
    /// Value applied at construction
    pub default: ParamValue,
    /// Inclusive valid range, if bounded
    pub range: Option<(f32, f32)>,
}

impl ParamInfo {
    const fn new(
        name: &'static str,
        index: u8,
        default: ParamValue,
        range: Option<(f32, f32)>,
    ) -> Self {
        let kind = match default {
            ParamValue::Int8(_) => ParamKind::Int8,
            ParamValue::Int16(_) => ParamKind::Int16,
            ParamValue::Float(_) => ParamKind::Float,
        };
        Self {
            name,
            index,
            kind,
            default,
            range,
        }
    }

    /// Check `value` against the valid range
    pub fn in_range(&self, value: f32) -> bool {
        match self.range {
            Some((min, max)) => value >= min && value <= max,
            None => true,
        }
    }
}

/// Every rangefinder parameter, in storage index order
///
/// Index 9 was used by a retired parameter and must not be reused.
pub const PARAM_SCHEMA: &[ParamInfo] = &[
    ParamInfo::new("TYPE", 1, ParamValue::Int8(0), Some((0.0, 1.0))),
    ParamInfo::new("PIN", 2, ParamValue::Int8(-1), Some((-1.0, 127.0))),
    ParamInfo::new("SCALING", 3, ParamValue::Float(3.0), None),
    ParamInfo::new("OFFSET", 4, ParamValue::Float(0.0), None),
    ParamInfo::new("FUNCTION", 5, ParamValue::Int8(0), Some((0.0, 2.0))),
    ParamInfo::new("MIN_CM", 6, ParamValue::Int16(20), Some((0.0, 32767.0))),
    ParamInfo::new("MAX_CM", 7, ParamValue::Int16(7000), Some((0.0, 32767.0))),
    ParamInfo::new("STOP_PIN", 8, ParamValue::Int8(-1), Some((-1.0, 127.0))),
    ParamInfo::new("RMETRIC", 10, ParamValue::Int8(1), Some((0.0, 1.0))),
    ParamInfo::new("PWRRNG", 11, ParamValue::Int16(0), Some((0.0, 32767.0))),
    ParamInfo::new("GNDCLEAR", 12, ParamValue::Int8(10), Some((5.0, 127.0))),
    ParamInfo::new("ADDR", 23, ParamValue::Int8(0), Some((0.0, 127.0))),
    ParamInfo::new("POS_X", 49, ParamValue::Float(0.0), None),
    ParamInfo::new("POS_Y", 49, ParamValue::Float(0.0), None),
    ParamInfo::new("POS_Z", 49, ParamValue::Float(0.0), None),
];

/// Look up a schema row by group-relative name (case-insensitive)
pub fn find_param(name: &str) -> Option<&'static ParamInfo> {
    PARAM_SCHEMA
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
}

/// Build the full name of a parameter for a 0-based slot
pub fn param_name(slot: usize, name: &str) -> Result<String<MAX_PARAM_NAME_LEN>, ParamError> {
    if slot >= MAX_RANGEFINDERS {
        return Err(ParamError::InvalidSlot);
    }
    let info = find_param(name).ok_or(ParamError::UnknownName)?;

    let mut full = String::new();
    write!(full, "{}{}_{}", PARAM_PREFIX, slot + 1, info.name)
        .map_err(|_| ParamError::UnknownName)?;
    Ok(full)
}

/// Split a full name (`RNGFND2_PIN`) into a 0-based slot and group name
pub fn split_param_name(full: &str) -> Option<(usize, &str)> {
    let rest = full.get(..PARAM_PREFIX.len())?;
    if !rest.eq_ignore_ascii_case(PARAM_PREFIX) {
        return None;
    }
    let rest = &full[PARAM_PREFIX.len()..];
    let mut chars = rest.char_indices();
    let (_, digit) = chars.next()?;
    let (underscore_at, underscore) = chars.next()?;
    if underscore != '_' {
        return None;
    }
    let slot = digit.to_digit(10)? as usize;
    if slot == 0 || slot > MAX_RANGEFINDERS {
        return None;
    }
    let name = &rest[underscore_at + 1..];
    find_param(name)?;
    Some((slot - 1, name))
}

impl RangefinderParams {
    /// Read a field by group-relative name
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let info = find_param(name)?;
        let value = match info.name {
            "TYPE" => ParamValue::Int8(self.rtype as i8),
            "PIN" => ParamValue::Int8(self.pin),
            "SCALING" => ParamValue::Float(self.scaling),
            "OFFSET" => ParamValue::Float(self.offset),
            "FUNCTION" => ParamValue::Int8(self.function as i8),
            "MIN_CM" => ParamValue::Int16(self.min_cm),
            "MAX_CM" => ParamValue::Int16(self.max_cm),
            "STOP_PIN" => ParamValue::Int8(self.stop_pin),
            "RMETRIC" => ParamValue::Int8(self.ratiometric as i8),
            "PWRRNG" => ParamValue::Int16(self.powersave_range),
            "GNDCLEAR" => ParamValue::Int8(self.ground_clearance_cm),
            "ADDR" => ParamValue::Int8(self.address),
            "POS_X" => ParamValue::Float(self.pos_offset.x),
            "POS_Y" => ParamValue::Float(self.pos_offset.y),
            "POS_Z" => ParamValue::Float(self.pos_offset.z),
            _ => return None,
        };
        Some(value)
    }

    /// Write a field by group-relative name
    ///
    /// The value is converted to the field's type and checked against the
    /// schema range. On error the field is left unchanged.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let info = find_param(name).ok_or(ParamError::UnknownName)?;
        let value = value.coerce(info.kind)?;
        if !info.in_range(value.as_f32()) {
            return Err(ParamError::OutOfRange);
        }

        match (info.name, value) {
            ("TYPE", ParamValue::Int8(v)) => {
                self.rtype = RangefinderType::from_u8(v as u8).ok_or(ParamError::OutOfRange)?;
            }
            ("PIN", ParamValue::Int8(v)) => self.pin = v,
            ("SCALING", ParamValue::Float(v)) => self.scaling = v,
            ("OFFSET", ParamValue::Float(v)) => self.offset = v,
            ("FUNCTION", ParamValue::Int8(v)) => {
                self.function = DistanceFunction::from_u8(v as u8).ok_or(ParamError::OutOfRange)?;
            }
            ("MIN_CM", ParamValue::Int16(v)) => self.min_cm = v,
            ("MAX_CM", ParamValue::Int16(v)) => self.max_cm = v,
            ("STOP_PIN", ParamValue::Int8(v)) => self.stop_pin = v,
            ("RMETRIC", ParamValue::Int8(v)) => self.ratiometric = v != 0,
            ("PWRRNG", ParamValue::Int16(v)) => self.powersave_range = v,
            ("GNDCLEAR", ParamValue::Int8(v)) => self.ground_clearance_cm = v,
            ("ADDR", ParamValue::Int8(v)) => self.address = v,
            ("POS_X", ParamValue::Float(v)) => self.pos_offset.x = v,
            ("POS_Y", ParamValue::Float(v)) => self.pos_offset.y = v,
            ("POS_Z", ParamValue::Float(v)) => self.pos_offset.z = v,
            _ => return Err(ParamError::TypeMismatch),
        }
        Ok(())
    }

    /// Restore one field to its schema default
    pub fn reset(&mut self, name: &str) -> Result<(), ParamError> {
        let info = find_param(name).ok_or(ParamError::UnknownName)?;
        self.set(info.name, info.default)
    }
}
