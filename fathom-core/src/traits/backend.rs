//! Rangefinder backend trait

use fathom_hal::Clock;

use crate::config::RangefinderParams;
use crate::state::{RangefinderState, RangefinderStatus};

/// Sensor technology, as reported in MAVLink `DISTANCE_SENSOR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MavDistanceSensor {
    Laser = 0,
    Ultrasound = 1,
    Infrared = 2,
    Radar = 3,
    Unknown = 4,
}

/// A distance sensor driver
///
/// Implementations own their [`RangefinderState`] and are the only writer
/// of it.
pub trait RangefinderBackend {
    /// Take one sample and publish a new state
    ///
    /// Called periodically by the owner. `params` is the slot's current
    /// configuration and may differ from the previous call.
    fn update<C: Clock>(&mut self, params: &RangefinderParams, clock: &C);

    /// Last published state
    fn state(&self) -> &RangefinderState;

    /// Sensor technology
    fn sensor_kind(&self) -> MavDistanceSensor;

    /// Current status
    fn status(&self) -> RangefinderStatus {
        self.state().status
    }

    /// Whether a measurement has been produced
    fn has_data(&self) -> bool {
        self.state().has_data()
    }
}
