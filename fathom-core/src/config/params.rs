//! Rangefinder parameter block
//!
//! One [`RangefinderParams`] exists per sensor slot. Fields are public so
//! the configuration layer can change them at any time; backends read them
//! afresh on every update.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of rangefinder slots
pub const MAX_RANGEFINDERS: usize = 2;

/// Default expected reading on the ground (cm)
pub const GROUND_CLEARANCE_CM_DEFAULT: i8 = 10;

/// Rangefinder driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum RangefinderType {
    /// Slot disabled
    #[default]
    None = 0,
    /// Analog voltage sensor
    Analog = 1,
}

impl RangefinderType {
    /// Decode from the stored integer value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RangefinderType::None),
            1 => Some(RangefinderType::Analog),
            _ => None,
        }
    }
}

/// Voltage to distance conversion function
///
/// `v` is the voltage in volts, results are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DistanceFunction {
    /// `(v - offset) * scaling`
    #[default]
    Linear = 0,
    /// `(offset - v) * scaling`
    Inverted = 1,
    /// `scaling / (v - offset)`, clamped to `MAX_CM`
    Hyperbolic = 2,
}

impl DistanceFunction {
    /// Decode from the stored integer value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DistanceFunction::Linear),
            1 => Some(DistanceFunction::Inverted),
            2 => Some(DistanceFunction::Hyperbolic),
            _ => None,
        }
    }
}

/// Body-frame position offset in meters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionOffset {
    /// Forward of the origin
    pub x: f32,
    /// Right of the origin
    pub y: f32,
    /// Down from the origin
    pub z: f32,
}

/// Parameters for one rangefinder slot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangefinderParams {
    /// Driver type
    pub rtype: RangefinderType,
    /// Analog pin, or -1 when not used
    pub pin: i8,
    /// Whether the sensor output scales with its supply voltage
    pub ratiometric: bool,
    /// Scaling factor (m/V for linear and inverted, m·V for hyperbolic)
    pub scaling: f32,
    /// Voltage at zero distance
    pub offset: f32,
    /// Conversion function
    pub function: DistanceFunction,
    /// Minimum reliable distance (cm)
    pub min_cm: i16,
    /// Maximum reliable distance (cm)
    pub max_cm: i16,
    /// Digital pin enabling the sensor, or -1
    pub stop_pin: i8,
    /// Distance above which the sensor may power down (m), 0 disables
    pub powersave_range: i16,
    /// Expected reading when the vehicle is on the ground (cm)
    pub ground_clearance_cm: i8,
    /// Bus address, where applicable
    pub address: i8,
    /// Mounting position
    pub pos_offset: PositionOffset,
}

impl Default for RangefinderParams {
    fn default() -> Self {
        Self {
            rtype: RangefinderType::None,
            pin: -1,
            ratiometric: true,
            scaling: 3.0,
            offset: 0.0,
            function: DistanceFunction::Linear,
            min_cm: 20,
            max_cm: 7000,
            stop_pin: -1,
            powersave_range: 0,
            ground_clearance_cm: GROUND_CLEARANCE_CM_DEFAULT,
            address: 0,
            pos_offset: PositionOffset::default(),
        }
    }
}

impl RangefinderParams {
    /// Create a parameter block with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for an analog sensor on `pin`, other fields default
    pub fn analog(pin: i8) -> Self {
        Self {
            rtype: RangefinderType::Analog,
            pin,
            ..Self::default()
        }
    }

    /// Maximum distance in meters
    pub fn max_distance_m(&self) -> f32 {
        f32::from(self.max_cm) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = RangefinderParams::new();
        assert_eq!(params.rtype, RangefinderType::None);
        assert_eq!(params.pin, -1);
        assert!(params.ratiometric);
        assert_eq!(params.scaling, 3.0);
        assert_eq!(params.offset, 0.0);
        assert_eq!(params.function, DistanceFunction::Linear);
        assert_eq!(params.min_cm, 20);
        assert_eq!(params.max_cm, 7000);
        assert_eq!(params.ground_clearance_cm, 10);
    }

    #[test]
    fn test_enum_decoding() {
        assert_eq!(DistanceFunction::from_u8(2), Some(DistanceFunction::Hyperbolic));
        assert_eq!(DistanceFunction::from_u8(3), None);
        assert_eq!(RangefinderType::from_u8(1), Some(RangefinderType::Analog));
        assert_eq!(RangefinderType::from_u8(9), None);
    }

    #[test]
    fn test_max_distance_m() {
        let params = RangefinderParams {
            max_cm: 500,
            ..RangefinderParams::analog(26)
        };
        assert_eq!(params.max_distance_m(), 5.0);
    }
}
