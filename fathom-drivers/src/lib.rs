//! Rangefinder driver implementations
//!
//! This crate provides concrete implementations of the backend trait
//! defined in fathom-core, and the frontend that owns them:
//!
//! - Analog voltage rangefinder
//! - Tagged-variant backend dispatch
//! - Multi-slot rangefinder frontend

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frontend;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing;

pub use frontend::Rangefinder;
pub use sensor::{AnalogRangefinder, Backend};
