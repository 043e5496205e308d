//! Fathom Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the rangefinder core
//! consumes. Chip-specific HALs implement them; host tests implement
//! them with test doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fathom-firmware                        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fathom-core / fathom-drivers           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fathom-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fathom-hal-rp2040                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`analog::AnalogIn`], [`analog::AnalogSource`] - Averaged ADC voltage
//! - [`time::Clock`] - Monotonic millisecond time
//! - [`flash::FlashStorage`] - Persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod flash;
pub mod time;

// Re-export key traits at crate root for convenience
pub use analog::{AnalogIn, AnalogSource};
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use time::Clock;
