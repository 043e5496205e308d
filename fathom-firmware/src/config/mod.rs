//! Parameter loading
//!
//! Loads rangefinder parameters from flash or embedded defaults.

pub mod loader;

pub use loader::{log_params_summary, ConfigError, ParamPersistence};

use defmt::*;

use fathom_core::config::{parse_params, RangefinderParams, MAX_RANGEFINDERS};
use fathom_hal_rp2040::Rp2040FlashStorage;

/// Embedded default parameters (compiled into firmware)
/// Edit rangefinder.toml and rebuild to customize
const EMBEDDED_PARAMS: &str = include_str!("../../rangefinder.toml");

/// Load parameters from flash, falling back to the embedded defaults
///
/// Embedded defaults are written back to flash so the next boot finds them.
pub async fn load_params(storage: Rp2040FlashStorage<'_>) -> [RangefinderParams; MAX_RANGEFINDERS] {
    let mut persistence = ParamPersistence::new(storage);

    match persistence.load().await {
        Ok(params) => {
            info!("Loaded parameters from flash");
            return params;
        }
        Err(e) => {
            info!("No valid parameters in flash ({:?}), using embedded defaults", e);
        }
    }

    let params = match parse_params(EMBEDDED_PARAMS) {
        Ok(params) => params,
        Err(e) => {
            // build.rs validates the file, so this means a loader mismatch
            error!("Embedded parameters rejected: {:?}, using built-in defaults", e);
            [RangefinderParams::default(); MAX_RANGEFINDERS]
        }
    };
    log_params_summary(&params);

    if let Err(e) = persistence.save(&params).await {
        warn!("Failed to save parameters to flash: {:?}", e);
    }

    params
}
