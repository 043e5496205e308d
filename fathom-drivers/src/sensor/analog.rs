//! Analog voltage rangefinder
//!
//! Converts the averaged voltage of one ADC pin into a distance using the
//! slot's configured function:
//!
//! | Function   | Distance (m)                                 |
//! |------------|----------------------------------------------|
//! | Linear     | `(v - offset) * scaling`                     |
//! | Inverted   | `(offset - v) * scaling`                     |
//! | Hyperbolic | `scaling / (v - offset)`, 0 if `v <= offset`, clamped to `MAX_CM` |
//!
//! Negative distances are published as zero. Only the hyperbolic function
//! has an upper clamp.

use fathom_core::config::{DistanceFunction, RangefinderParams};
use fathom_core::state::{RangefinderState, RangefinderStatus};
use fathom_core::traits::{MavDistanceSensor, RangefinderBackend};
use fathom_hal::analog::ANALOG_PIN_NONE;
use fathom_hal::{AnalogIn, AnalogSource, Clock};

/// Rangefinder reading an analog voltage
///
/// Holds its analog source exclusively. If no source could be allocated
/// the backend stays `NotConnected` and every update is a no-op.
pub struct AnalogRangefinder<S> {
    source: Option<S>,
    state: RangefinderState,
}

impl<S: AnalogSource> AnalogRangefinder<S> {
    /// Check whether an analog rangefinder is configured for this slot
    ///
    /// The only thing we can check is that a pin is set; if it is, assume
    /// the sensor is connected.
    pub fn detect(params: &RangefinderParams) -> bool {
        params.pin != ANALOG_PIN_NONE
    }

    /// Create the backend, allocating a source on the configured pin
    ///
    /// Only call this after [`detect`](Self::detect) returned true.
    pub fn new<A>(params: &RangefinderParams, analog: &mut A) -> Self
    where
        A: AnalogIn<Source = S>,
    {
        let source = analog.channel(params.pin);
        let mut state = RangefinderState::new();

        if source.is_none() {
            // Source pool exhausted; shouldn't happen with a sane config
            state.set_status(RangefinderStatus::NotConnected);
        } else {
            state.set_status(RangefinderStatus::NoData);
        }

        Self { source, state }
    }

    /// Get access to the underlying source
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mark the sensor as switched off by configuration
    ///
    /// The published measurement is kept; the next update re-evaluates the
    /// status.
    pub fn disable(&mut self) {
        self.state.set_status(RangefinderStatus::NotConnected);
    }

    /// Sample the source into `voltage_mv`
    ///
    /// PIN and RMETRIC are read from `params` on every call so changes
    /// apply on the next sample.
    fn update_voltage(&mut self, params: &RangefinderParams) {
        let Some(source) = self.source.as_mut() else {
            self.state.voltage_mv = 0;
            return;
        };

        source.set_pin(params.pin);
        let volts = if params.ratiometric {
            source.voltage_average_ratiometric()
        } else {
            source.voltage_average()
        };
        self.state.voltage_mv = volts_to_mv(volts);
    }
}

impl<S: AnalogSource> RangefinderBackend for AnalogRangefinder<S> {
    fn update<C: Clock>(&mut self, params: &RangefinderParams, clock: &C) {
        self.update_voltage(params);
        if self.source.is_none() {
            // Keep the last measurement rather than inventing a zero
            return;
        }

        let v = f32::from(self.state.voltage_mv) / 1000.0;
        let dist_m = voltage_to_distance_m(params, v);

        self.state.distance_cm = dist_m * 100.0;
        self.state.last_reading_ms = clock.now_ms();

        self.state.update_status(params);
    }

    fn state(&self) -> &RangefinderState {
        &self.state
    }

    fn sensor_kind(&self) -> MavDistanceSensor {
        MavDistanceSensor::Unknown
    }
}

/// Convert volts to whole millivolts
///
/// Truncates; negative and NaN inputs give 0, values above 65.535 V
/// saturate.
pub fn volts_to_mv(volts: f32) -> u16 {
    (volts * 1000.0) as u16
}

/// Apply the configured conversion function to a voltage
///
/// Returns meters, never negative.
pub fn voltage_to_distance_m(params: &RangefinderParams, v: f32) -> f32 {
    let scaling = params.scaling;
    let offset = params.offset;

    let dist_m = match params.function {
        DistanceFunction::Linear => (v - offset) * scaling,
        DistanceFunction::Inverted => (offset - v) * scaling,
        DistanceFunction::Hyperbolic => {
            let dist_m = if v <= offset {
                0.0
            } else {
                scaling / (v - offset)
            };
            let max_m = params.max_distance_m();
            if dist_m > max_m {
                max_m
            } else {
                dist_m
            }
        }
    };

    // Also maps NaN to zero
    dist_m.max(0.0)
}
