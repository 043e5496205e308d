//! Fathom - Analog Rangefinder Firmware
//!
//! Main firmware binary for RP2040 boards reading analog distance sensors
//! (echo sounders, IR and ultrasonic rangers with a voltage output).

#![no_std]
#![no_main]

use core::cell::Cell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use fathom_core::config::MAX_RANGEFINDERS;
use fathom_core::state::RangefinderStatus;
use fathom_drivers::Rangefinder;
use fathom_hal_rp2040::{AdcBank, Rp2040AnalogIn, Rp2040FlashStorage};

use crate::channels::{SharedParams, RANGE_READING};

mod channels;
mod config;
mod tasks;

// Static cells for state shared with tasks (must live forever)
static ADC_BANK: StaticCell<AdcBank<'static>> = StaticCell::new();
static PARAMS: StaticCell<SharedParams> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Fathom firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load parameters from flash (or use embedded defaults)
    let storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let params = config::load_params(storage).await;
    let shared_params: &'static SharedParams = PARAMS.init(Mutex::new(Cell::new(params)));

    // GPIO26-28 are the analog inputs, GPIO29 measures VSYS
    let bank = ADC_BANK.init(AdcBank::new(
        p.ADC, p.PIN_26, p.PIN_27, p.PIN_28, p.PIN_29,
    ));
    let mut analog = Rp2040AnalogIn::new(bank);

    let mut rangefinder = Rangefinder::new();
    rangefinder.init(&params, &mut analog);

    for i in 0..MAX_RANGEFINDERS {
        match rangefinder.backend(i) {
            Some(backend) => info!(
                "RNGFND{}: {} on GPIO{}, status {}",
                i + 1,
                backend.rtype(),
                params[i].pin,
                rangefinder.status(i)
            ),
            None => debug!("RNGFND{}: disabled", i + 1),
        }
    }
    info!("ADC and rangefinders initialized");

    match tasks::rangefinder_task(rangefinder, shared_params) {
        Ok(token) => spawner.spawn(token),
        Err(_) => {
            error!("Failed to spawn rangefinder task");
            return;
        }
    }

    info!("All tasks spawned, firmware running");

    // Report readings; status changes at info, every sample at debug
    let mut last_status = [RangefinderStatus::NotConnected; MAX_RANGEFINDERS];
    loop {
        let readings = RANGE_READING.wait().await;

        for (i, reading) in readings.iter().enumerate() {
            let Some(state) = reading else {
                continue;
            };

            if state.status != last_status[i] {
                info!("RNGFND{}: {} -> {}", i + 1, last_status[i], state.status);
                last_status[i] = state.status;
            }

            debug!(
                "RNGFND{}: {}cm ({}mV) valid={}",
                i + 1,
                state.distance_cm,
                state.voltage_mv,
                state.range_valid_count
            );
        }
    }
}
