//! Analog input abstractions
//!
//! An [`AnalogIn`] hands out [`AnalogSource`] handles, each bound to one
//! analog pin. Sources report averaged voltages in volts.

/// Pin number meaning "no analog pin"
pub const ANALOG_PIN_NONE: i8 = -1;

/// Averaged voltage reader bound to one analog pin
///
/// Reads take `&mut self` because sampling an ADC needs mutable access.
pub trait AnalogSource {
    /// Rebind the source to another pin
    ///
    /// Must be cheap and idempotent: callers rebind on every sample so
    /// configuration changes take effect immediately. Returns false if
    /// the pin cannot be sampled; the source stays usable and reads 0 V.
    fn set_pin(&mut self, pin: i8) -> bool;

    /// Currently bound pin
    fn pin(&self) -> i8;

    /// Average voltage in volts
    fn voltage_average(&mut self) -> f32;

    /// Average voltage in volts, corrected for supply voltage
    ///
    /// For sensors whose output scales with their supply, this returns
    /// the reading as if the supply were exactly 5 V.
    fn voltage_average_ratiometric(&mut self) -> f32;
}

/// Provider of analog sources
pub trait AnalogIn {
    /// Source type handed out by this provider
    type Source: AnalogSource;

    /// Allocate a source bound to `pin`
    ///
    /// Returns `None` when the provider has no sources left.
    fn channel(&mut self, pin: i8) -> Option<Self::Source>;
}
