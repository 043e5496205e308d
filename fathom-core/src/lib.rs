//! Board-agnostic core logic for the rangefinder firmware
//!
//! This crate contains everything that does not depend on a specific
//! sensor backend or chip:
//!
//! - Parameter store (typed fields, schema, TOML loader, persisted block)
//! - Shared sensor state and the status hook
//! - The backend trait implemented by sensor drivers

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod state;
pub mod traits;
