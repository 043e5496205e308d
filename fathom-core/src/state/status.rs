//! Rangefinder state and status
//!
//! Status transitions:
//!
//! ```text
//!  construct ──► NoData ──► update_status() ──► OutOfRangeLow
//!      │                          │        ──► Good
//!      │                          │        ──► OutOfRangeHigh
//!      ▼                          └── re-evaluated every sample
//!  NotConnected (source allocation failed, terminal)
//! ```

use crate::config::RangefinderParams;

/// Saturation point of the consecutive-good-reading counter
pub const RANGE_VALID_COUNT_MAX: u8 = 10;

/// Sensor health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RangefinderStatus {
    /// No hardware available
    NotConnected = 0,
    /// Constructed, nothing sampled yet
    #[default]
    NoData = 1,
    /// Distance below `MIN_CM`
    OutOfRangeLow = 2,
    /// Distance above `MAX_CM`
    OutOfRangeHigh = 3,
    /// Distance inside the reliable range
    Good = 4,
}

/// Last published measurement of one sensor
///
/// Zero-initialised at construction and written only by the owning
/// backend's update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangefinderState {
    /// Last sampled voltage (mV)
    pub voltage_mv: u16,
    /// Last computed distance (cm), never negative
    pub distance_cm: f32,
    /// Time of the last computation (ms)
    pub last_reading_ms: u32,
    /// Health indicator
    pub status: RangefinderStatus,
    /// Consecutive `Good` classifications, saturating
    pub range_valid_count: u8,
}

impl RangefinderState {
    /// Zeroed state with `NoData` status
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status and track consecutive good readings
    pub fn set_status(&mut self, status: RangefinderStatus) {
        self.status = status;
        if status == RangefinderStatus::Good {
            if self.range_valid_count < RANGE_VALID_COUNT_MAX {
                self.range_valid_count += 1;
            }
        } else {
            self.range_valid_count = 0;
        }
    }

    /// Classify the published distance against the configured range
    pub fn update_status(&mut self, params: &RangefinderParams) {
        if self.distance_cm > f32::from(params.max_cm) {
            self.set_status(RangefinderStatus::OutOfRangeHigh);
        } else if self.distance_cm < f32::from(params.min_cm) {
            self.set_status(RangefinderStatus::OutOfRangeLow);
        } else {
            self.set_status(RangefinderStatus::Good);
        }
    }

    /// Whether a measurement has been produced
    pub fn has_data(&self) -> bool {
        !matches!(
            self.status,
            RangefinderStatus::NotConnected | RangefinderStatus::NoData
        )
    }
}
