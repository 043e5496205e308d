//! RP2040-specific HAL for the rangefinder firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `fathom-hal` traits:
//!
//! - ADC-backed analog sources (implements `fathom_hal::AnalogIn`)
//! - Flash storage driver (implements `fathom_hal::FlashStorage`)
//! - Embassy time clock (implements `fathom_hal::Clock`)

#![no_std]

pub mod adc;
pub mod flash;
pub mod time;

// Re-export shared traits from fathom-hal for convenience
pub use fathom_hal::{AnalogIn, AnalogSource, Clock, FlashStorage as FlashStorageTrait, StorageKey};

pub use adc::{AdcBank, Rp2040AnalogIn, Rp2040AnalogSource};
pub use flash::Rp2040FlashStorage;
pub use time::EmbassyClock;
