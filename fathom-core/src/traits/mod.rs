//! Backend traits
//!
//! These traits define the interface between the rangefinder frontend
//! and concrete sensor drivers.

pub mod backend;

pub use backend::{MavDistanceSensor, RangefinderBackend};
