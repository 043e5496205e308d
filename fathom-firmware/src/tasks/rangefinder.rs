//! Rangefinder update task
//!
//! Samples every configured slot at a fixed rate and publishes the
//! resulting states on [`RANGE_READING`].

use core::cell::Cell;

use defmt::*;
use embassy_time::{Duration, Ticker};

use fathom_drivers::Rangefinder;
use fathom_hal_rp2040::{EmbassyClock, Rp2040AnalogSource};

use crate::channels::{RangeReadings, SharedParams, RANGE_READING};

/// Update interval in milliseconds (20 Hz)
pub const UPDATE_INTERVAL_MS: u64 = 50;

#[embassy_executor::task]
pub async fn rangefinder_task(
    mut rangefinder: Rangefinder<Rp2040AnalogSource<'static>>,
    params: &'static SharedParams,
) {
    info!(
        "Rangefinder task started, {} sensor(s)",
        rangefinder.num_sensors()
    );

    let clock = EmbassyClock;
    let mut ticker = Ticker::every(Duration::from_millis(UPDATE_INTERVAL_MS));

    loop {
        ticker.next().await;

        // Fresh copy each cycle so parameter edits apply immediately
        let snapshot = params.lock(Cell::get);
        rangefinder.update(&snapshot, &clock);

        let readings: RangeReadings = core::array::from_fn(|i| rangefinder.state(i).copied());
        RANGE_READING.signal(readings);
    }
}
