//! Rangefinder sensor backends

pub mod analog;

pub use analog::{voltage_to_distance_m, volts_to_mv, AnalogRangefinder};

use fathom_core::config::{RangefinderParams, RangefinderType};
use fathom_core::state::RangefinderState;
use fathom_core::traits::{MavDistanceSensor, RangefinderBackend};
use fathom_hal::{AnalogIn, AnalogSource, Clock};

/// Every backend the frontend can own
///
/// New sensor types add a variant here and an arm in [`Backend::probe`].
pub enum Backend<S> {
    Analog(AnalogRangefinder<S>),
}

impl<S: AnalogSource> Backend<S> {
    /// Create the backend configured for a slot, if any
    ///
    /// Returns `None` when the slot is disabled or the configured sensor
    /// is not detected.
    pub fn probe<A>(params: &RangefinderParams, analog: &mut A) -> Option<Self>
    where
        A: AnalogIn<Source = S>,
    {
        match params.rtype {
            RangefinderType::None => None,
            RangefinderType::Analog => {
                if !AnalogRangefinder::<S>::detect(params) {
                    return None;
                }
                Some(Backend::Analog(AnalogRangefinder::new(params, analog)))
            }
        }
    }

    /// Report `NotConnected` for a slot disabled at runtime
    pub fn disable(&mut self) {
        match self {
            Backend::Analog(sensor) => sensor.disable(),
        }
    }

    /// Configured sensor type
    pub fn rtype(&self) -> RangefinderType {
        match self {
            Backend::Analog(_) => RangefinderType::Analog,
        }
    }
}

impl<S: AnalogSource> RangefinderBackend for Backend<S> {
    fn update<C: Clock>(&mut self, params: &RangefinderParams, clock: &C) {
        match self {
            Backend::Analog(sensor) => sensor.update(params, clock),
        }
    }

    fn state(&self) -> &RangefinderState {
        match self {
            Backend::Analog(sensor) => sensor.state(),
        }
    }

    fn sensor_kind(&self) -> MavDistanceSensor {
        match self {
            Backend::Analog(sensor) => sensor.sensor_kind(),
        }
    }
}
