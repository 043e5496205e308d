//! Rangefinder frontend
//!
//! Owns one optional backend per slot. The frontend does no arbitration or
//! filtering between sensors; callers pick the slot they want.

use fathom_core::config::{PositionOffset, RangefinderParams, RangefinderType, MAX_RANGEFINDERS};
use fathom_core::state::{RangefinderState, RangefinderStatus};
use fathom_core::traits::{MavDistanceSensor, RangefinderBackend};
use fathom_hal::{AnalogIn, AnalogSource, Clock};

use crate::sensor::Backend;

/// Set of rangefinder slots
pub struct Rangefinder<S> {
    backends: [Option<Backend<S>>; MAX_RANGEFINDERS],
    num_instances: u8,
}

impl<S: AnalogSource> Default for Rangefinder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AnalogSource> Rangefinder<S> {
    /// Create a frontend with every slot empty
    pub fn new() -> Self {
        Self {
            backends: core::array::from_fn(|_| None),
            num_instances: 0,
        }
    }

    /// Probe every empty slot and create its backend
    ///
    /// Slots that already hold a backend are left alone, so calling this
    /// again only picks up newly enabled slots.
    pub fn init<A>(&mut self, params: &[RangefinderParams; MAX_RANGEFINDERS], analog: &mut A)
    where
        A: AnalogIn<Source = S>,
    {
        for (slot, slot_params) in self.backends.iter_mut().zip(params.iter()) {
            if slot.is_some() {
                continue;
            }
            *slot = Backend::probe(slot_params, analog);
        }

        // Number of slots up to and including the last populated one
        self.num_instances = self
            .backends
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i as u8 + 1);
    }

    /// Sample every populated slot with its current parameters
    ///
    /// A slot whose TYPE was set to None since `init` keeps its backend but
    /// is not sampled; it reports `NotConnected` until re-enabled.
    pub fn update<C: Clock>(&mut self, params: &[RangefinderParams; MAX_RANGEFINDERS], clock: &C) {
        for (backend, slot_params) in self.backends.iter_mut().zip(params.iter()) {
            let Some(backend) = backend else {
                continue;
            };
            if slot_params.rtype == RangefinderType::None {
                backend.disable();
                continue;
            }
            backend.update(slot_params, clock);
        }
    }

    /// Number of slots in use
    pub fn num_sensors(&self) -> u8 {
        self.num_instances
    }

    /// Backend in slot `instance`
    pub fn backend(&self, instance: usize) -> Option<&Backend<S>> {
        self.backends.get(instance)?.as_ref()
    }

    /// Last published state of a slot
    pub fn state(&self, instance: usize) -> Option<&RangefinderState> {
        self.backend(instance).map(RangefinderBackend::state)
    }

    /// Status of a slot; empty slots are `NotConnected`
    pub fn status(&self, instance: usize) -> RangefinderStatus {
        self.backend(instance)
            .map_or(RangefinderStatus::NotConnected, RangefinderBackend::status)
    }

    /// Whether a slot has produced a measurement
    pub fn has_data(&self, instance: usize) -> bool {
        self.backend(instance)
            .is_some_and(RangefinderBackend::has_data)
    }

    /// Last distance (cm)
    pub fn distance_cm(&self, instance: usize) -> Option<f32> {
        self.state(instance).map(|s| s.distance_cm)
    }

    /// Last sampled voltage (mV)
    pub fn voltage_mv(&self, instance: usize) -> Option<u16> {
        self.state(instance).map(|s| s.voltage_mv)
    }

    /// Time of the last measurement (ms)
    pub fn last_reading_ms(&self, instance: usize) -> Option<u32> {
        self.state(instance).map(|s| s.last_reading_ms)
    }

    /// Consecutive good readings, 0 for an empty slot
    pub fn range_valid_count(&self, instance: usize) -> u8 {
        self.state(instance).map_or(0, |s| s.range_valid_count)
    }

    /// Sensor technology of a slot
    pub fn sensor_kind(&self, instance: usize) -> Option<MavDistanceSensor> {
        self.backend(instance).map(RangefinderBackend::sensor_kind)
    }

    /// Configured on-ground reading, if the slot has a backend
    pub fn ground_clearance_cm(
        &self,
        instance: usize,
        params: &[RangefinderParams; MAX_RANGEFINDERS],
    ) -> Option<i8> {
        self.backend(instance)?;
        params.get(instance).map(|p| p.ground_clearance_cm)
    }

    /// Configured mounting position, if the slot has a backend
    pub fn pos_offset(
        &self,
        instance: usize,
        params: &[RangefinderParams; MAX_RANGEFINDERS],
    ) -> Option<PositionOffset> {
        self.backend(instance)?;
        params.get(instance).map(|p| p.pos_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAnalogIn, MockSource, TestClock};

    fn slot(pin: i8) -> RangefinderParams {
        RangefinderParams {
            ratiometric: false,
            ..RangefinderParams::analog(pin)
        }
    }

    #[test]
    fn test_empty_frontend() {
        let rf = Rangefinder::<MockSource>::new();
        assert_eq!(rf.num_sensors(), 0);
        assert_eq!(rf.status(0), RangefinderStatus::NotConnected);
        assert_eq!(rf.status(7), RangefinderStatus::NotConnected);
        assert!(!rf.has_data(0));
        assert_eq!(rf.distance_cm(0), None);
        assert_eq!(rf.range_valid_count(1), 0);
    }

    #[test]
    fn test_init_populates_enabled_slots() {
        let params = [RangefinderParams::default(), slot(27)];
        let mut analog = MockAnalogIn::new(2, 1.0);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        assert!(rf.backend(0).is_none());
        assert_eq!(rf.backend(1).map(Backend::rtype), Some(RangefinderType::Analog));
        assert_eq!(rf.num_sensors(), 2);
        assert_eq!(rf.status(1), RangefinderStatus::NoData);
        assert_eq!(analog.requested, vec![27]);
    }

    #[test]
    fn test_reinit_is_noop_for_populated_slots() {
        let mut params = [slot(26), RangefinderParams::default()];
        let mut analog = MockAnalogIn::new(4, 1.0);
        let mut rf = Rangefinder::new();

        rf.init(&params, &mut analog);
        assert_eq!(rf.num_sensors(), 1);

        params[1] = slot(28);
        rf.init(&params, &mut analog);
        assert_eq!(analog.requested, vec![26, 28]);
        assert_eq!(rf.num_sensors(), 2);
    }

    #[test]
    fn test_update_uses_each_slots_params() {
        let mut params = [slot(26), slot(27)];
        params[1].scaling = 1.0;
        let mut analog = MockAnalogIn::new(2, 2.0);
        let clock = TestClock::new(100);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        rf.update(&params, &clock);
        assert_eq!(rf.distance_cm(0), Some(600.0));
        assert_eq!(rf.distance_cm(1), Some(200.0));
        assert_eq!(rf.voltage_mv(0), Some(2000));
        assert_eq!(rf.last_reading_ms(1), Some(100));
        assert_eq!(rf.status(0), RangefinderStatus::Good);
        assert_eq!(rf.range_valid_count(0), 1);
        assert!(rf.has_data(1));
        assert_eq!(rf.sensor_kind(0), Some(MavDistanceSensor::Unknown));
    }

    #[test]
    fn test_parameter_change_applies_on_next_update() {
        let mut params = [slot(26), RangefinderParams::default()];
        let mut analog = MockAnalogIn::new(1, 2.0);
        let clock = TestClock::new(0);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        rf.update(&params, &clock);
        assert_eq!(rf.distance_cm(0), Some(600.0));

        params[0].offset = 1.0;
        rf.update(&params, &clock);
        assert_eq!(rf.distance_cm(0), Some(300.0));
    }

    #[test]
    fn test_range_valid_count_saturates() {
        let params = [slot(26), RangefinderParams::default()];
        let mut analog = MockAnalogIn::new(1, 1.0);
        let clock = TestClock::new(0);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        for _ in 0..20 {
            rf.update(&params, &clock);
            clock.advance(50);
        }
        assert_eq!(rf.range_valid_count(0), 10);
    }

    #[test]
    fn test_type_none_at_runtime_reports_not_connected() {
        let mut params = [slot(26), RangefinderParams::default()];
        let mut analog = MockAnalogIn::new(1, 2.0);
        let clock = TestClock::new(0);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        for _ in 0..3 {
            rf.update(&params, &clock);
        }
        assert_eq!(rf.range_valid_count(0), 3);

        params[0].rtype = RangefinderType::None;
        params[0].offset = 1.0;
        clock.advance(100);
        rf.update(&params, &clock);
        assert_eq!(rf.status(0), RangefinderStatus::NotConnected);
        assert_eq!(rf.range_valid_count(0), 0);
        assert!(!rf.has_data(0));
        // Not sampled while disabled
        assert_eq!(rf.distance_cm(0), Some(600.0));
        assert_eq!(rf.last_reading_ms(0), Some(0));

        params[0].rtype = RangefinderType::Analog;
        rf.update(&params, &clock);
        assert_eq!(rf.status(0), RangefinderStatus::Good);
        assert_eq!(rf.distance_cm(0), Some(300.0));
        assert_eq!(rf.range_valid_count(0), 1);
    }

    #[test]
    fn test_config_accessors_require_backend() {
        let mut params = [slot(26), RangefinderParams::default()];
        params[0].ground_clearance_cm = 25;
        params[0].pos_offset.z = 0.1;
        let mut analog = MockAnalogIn::new(1, 1.0);
        let mut rf = Rangefinder::new();
        rf.init(&params, &mut analog);

        assert_eq!(rf.ground_clearance_cm(0, &params), Some(25));
        assert_eq!(rf.pos_offset(0, &params).map(|p| p.z), Some(0.1));
        assert_eq!(rf.ground_clearance_cm(1, &params), None);
        assert_eq!(rf.pos_offset(1, &params), None);
    }
}
