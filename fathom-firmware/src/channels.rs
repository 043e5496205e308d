//! Inter-task communication channels
//!
//! Defines the shared state used between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use fathom_core::config::{RangefinderParams, MAX_RANGEFINDERS};
use fathom_core::state::RangefinderState;

/// Live parameters for every slot
///
/// Written by the configuration layer, copied by the rangefinder task at
/// the start of every cycle.
pub type SharedParams = Mutex<CriticalSectionRawMutex, Cell<[RangefinderParams; MAX_RANGEFINDERS]>>;

/// Latest state of every slot, `None` for empty slots
pub type RangeReadings = [Option<RangefinderState>; MAX_RANGEFINDERS];

/// Range reading signal (updated by rangefinder task)
pub static RANGE_READING: Signal<CriticalSectionRawMutex, RangeReadings> = Signal::new();
