//! ADC-backed analog sources
//!
//! RP2040 has a single 12-bit ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29, VSYS through a 1/3 divider on the Pico
//! - ADC4: Internal temperature sensor
//!
//! GPIO26-28 are exposed as analog pins. GPIO29 is reserved for the supply
//! measurement used by ratiometric reads.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{ADC, PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use fathom_hal::{AnalogIn, AnalogSource};

/// ADC reference voltage
pub const ADC_VREF: f32 = 3.3;

/// Full-scale count of a 12-bit conversion
pub const ADC_COUNTS: f32 = 4096.0;

/// Conversions averaged per reading
pub const SAMPLES_PER_READ: u32 = 8;

/// Divider ratio between VSYS and GPIO29
pub const VSYS_DIVIDER: f32 = 3.0;

/// Supply voltage ratiometric readings are normalised to
pub const RATIOMETRIC_SUPPLY: f32 = 5.0;

/// Below this VSYS reading the supply measurement is not trusted
pub const VSYS_MIN: f32 = 1.0;

/// Number of sources [`Rp2040AnalogIn`] hands out
pub const MAX_ANALOG_SOURCES: usize = 3;

/// ADC channel identifier for the exposed analog pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
}

impl AdcChannel {
    /// Get ADC channel from GPIO pin
    pub fn from_gpio(gpio: i8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Convert an averaged raw count to volts at the pin
pub fn counts_to_volts(counts: f32) -> f32 {
    counts * ADC_VREF / ADC_COUNTS
}

/// Rescale a pin voltage to what it would read with a 5 V supply
///
/// Returns `volts` unchanged when the supply reading is implausible.
pub fn ratiometric(volts: f32, vsys: f32) -> f32 {
    if vsys < VSYS_MIN {
        return volts;
    }
    volts * RATIOMETRIC_SUPPLY / vsys
}

struct AdcInner<'d> {
    adc: Adc<'d, Blocking>,
    channels: [Channel<'d>; 3],
    vsys: Channel<'d>,
}

impl<'d> AdcInner<'d> {
    /// Average of the successful conversions, in raw counts
    fn average_counts(adc: &mut Adc<'d, Blocking>, channel: &mut Channel<'d>) -> Option<f32> {
        let mut sum = 0u32;
        let mut count = 0u32;
        for _ in 0..SAMPLES_PER_READ {
            if let Ok(raw) = adc.blocking_read(channel) {
                sum += u32::from(raw);
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }
        Some(sum as f32 / count as f32)
    }

    fn read_pin(&mut self, channel: AdcChannel) -> f32 {
        let counts = Self::average_counts(&mut self.adc, &mut self.channels[channel.index()]);
        counts.map_or(0.0, counts_to_volts)
    }

    fn read_vsys(&mut self) -> f32 {
        let counts = Self::average_counts(&mut self.adc, &mut self.vsys);
        counts.map_or(0.0, |c| counts_to_volts(c) * VSYS_DIVIDER)
    }
}

/// The ADC and its analog pins, shared by every source
///
/// Conversions run inside a critical section so sources on different
/// tasks never interleave.
pub struct AdcBank<'d> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<AdcInner<'d>>>,
}

impl<'d> AdcBank<'d> {
    /// Take ownership of the ADC and GPIO26-29
    pub fn new(
        adc: Peri<'d, ADC>,
        pin26: Peri<'d, PIN_26>,
        pin27: Peri<'d, PIN_27>,
        pin28: Peri<'d, PIN_28>,
        vsys: Peri<'d, PIN_29>,
    ) -> Self {
        let inner = AdcInner {
            adc: Adc::new_blocking(adc, Config::default()),
            channels: [
                Channel::new_pin(pin26, Pull::None),
                Channel::new_pin(pin27, Pull::None),
                Channel::new_pin(pin28, Pull::None),
            ],
            vsys: Channel::new_pin(vsys, Pull::None),
        };
        Self {
            inner: Mutex::new(RefCell::new(inner)),
        }
    }

    /// Averaged voltage on an analog pin
    pub fn voltage(&self, channel: AdcChannel) -> f32 {
        self.inner.lock(|inner| inner.borrow_mut().read_pin(channel))
    }

    /// Averaged pin voltage and supply voltage, sampled together
    pub fn voltage_and_vsys(&self, channel: AdcChannel) -> (f32, f32) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let volts = inner.read_pin(channel);
            (volts, inner.read_vsys())
        })
    }
}

/// Analog source bound to one pin of an [`AdcBank`]
pub struct Rp2040AnalogSource<'d> {
    bank: &'d AdcBank<'d>,
    pin: i8,
    channel: Option<AdcChannel>,
}

impl<'d> AnalogSource for Rp2040AnalogSource<'d> {
    fn set_pin(&mut self, pin: i8) -> bool {
        if pin == self.pin {
            return self.channel.is_some();
        }

        self.pin = pin;
        self.channel = AdcChannel::from_gpio(pin);
        if self.channel.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("GPIO{} is not an analog pin, reading 0V", pin);
            return false;
        }
        true
    }

    fn pin(&self) -> i8 {
        self.pin
    }

    fn voltage_average(&mut self) -> f32 {
        self.channel.map_or(0.0, |ch| self.bank.voltage(ch))
    }

    fn voltage_average_ratiometric(&mut self) -> f32 {
        match self.channel {
            Some(ch) => {
                let (volts, vsys) = self.bank.voltage_and_vsys(ch);
                ratiometric(volts, vsys)
            }
            None => 0.0,
        }
    }
}

/// Bounded pool of analog sources over an [`AdcBank`]
pub struct Rp2040AnalogIn<'d> {
    bank: &'d AdcBank<'d>,
    allocated: usize,
}

impl<'d> Rp2040AnalogIn<'d> {
    /// Pool with all of its sources still available
    pub fn new(bank: &'d AdcBank<'d>) -> Self {
        Self { bank, allocated: 0 }
    }
}

impl<'d> AnalogIn for Rp2040AnalogIn<'d> {
    type Source = Rp2040AnalogSource<'d>;

    fn channel(&mut self, pin: i8) -> Option<Self::Source> {
        if self.allocated >= MAX_ANALOG_SOURCES {
            #[cfg(feature = "defmt")]
            defmt::error!("No analog sources left for GPIO{}", pin);
            return None;
        }
        self.allocated += 1;

        let mut source = Rp2040AnalogSource {
            bank: self.bank,
            pin: -1,
            channel: None,
        };
        source.set_pin(pin);
        Some(source)
    }
}
