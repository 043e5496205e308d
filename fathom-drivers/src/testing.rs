//! Test doubles for the analog input and clock capabilities

use core::cell::Cell;

use fathom_hal::{AnalogIn, AnalogSource, Clock};

/// Which voltage read the backend asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPath {
    Raw,
    Ratiometric,
}

/// Source returning fixed voltages and recording every call
#[derive(Debug)]
pub struct MockSource {
    pub pin: i8,
    pub volts: f32,
    pub ratiometric_volts: f32,
    pub set_pin_calls: Vec<i8>,
    pub reads: Vec<ReadPath>,
}

impl MockSource {
    pub fn new(pin: i8, volts: f32, ratiometric_volts: f32) -> Self {
        Self {
            pin,
            volts,
            ratiometric_volts,
            set_pin_calls: Vec::new(),
            reads: Vec::new(),
        }
    }
}

impl AnalogSource for MockSource {
    fn set_pin(&mut self, pin: i8) -> bool {
        self.pin = pin;
        self.set_pin_calls.push(pin);
        true
    }

    fn pin(&self) -> i8 {
        self.pin
    }

    fn voltage_average(&mut self) -> f32 {
        self.reads.push(ReadPath::Raw);
        self.volts
    }

    fn voltage_average_ratiometric(&mut self) -> f32 {
        self.reads.push(ReadPath::Ratiometric);
        self.ratiometric_volts
    }
}

/// Provider with a fixed number of sources to hand out
#[derive(Debug)]
pub struct MockAnalogIn {
    pub available: usize,
    pub volts: f32,
    pub ratiometric_volts: f32,
    pub requested: Vec<i8>,
}

impl MockAnalogIn {
    pub fn new(available: usize, volts: f32) -> Self {
        Self {
            available,
            volts,
            ratiometric_volts: volts,
            requested: Vec::new(),
        }
    }

    /// Provider with no sources left
    pub fn exhausted() -> Self {
        Self::new(0, 0.0)
    }
}

impl AnalogIn for MockAnalogIn {
    type Source = MockSource;

    fn channel(&mut self, pin: i8) -> Option<MockSource> {
        self.requested.push(pin);
        if self.available == 0 {
            return None;
        }
        self.available -= 1;
        Some(MockSource::new(pin, self.volts, self.ratiometric_volts))
    }
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct TestClock(Cell<u32>);

impl TestClock {
    pub fn new(now_ms: u32) -> Self {
        Self(Cell::new(now_ms))
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}
