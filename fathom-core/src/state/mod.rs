//! Shared sensor state
//!
//! The measurement a backend publishes, plus the status hook that
//! classifies it against the configured range.

pub mod status;

pub use status::{RangefinderState, RangefinderStatus, RANGE_VALID_COUNT_MAX};
