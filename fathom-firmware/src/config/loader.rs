//! Parameter persistence
//!
//! Loads rangefinder parameters from flash storage and writes them back.

use core::str;
use defmt::*;

use fathom_core::config::{
    parse_params, ParamStore, ParseError, RangefinderParams, StoreError, MAX_PARAM_STORE_SIZE,
    MAX_RANGEFINDERS,
};
use fathom_hal_rp2040::flash::{FlashError, StorageKey};
use fathom_hal_rp2040::{FlashStorageTrait, Rp2040FlashStorage};

/// Maximum TOML params size
const MAX_TOML_SIZE: usize = 2048;

/// Parameter persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Binary block could not be encoded or decoded
    Store(StoreError),
    /// TOML parsing failed
    TomlParse(ParseError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        ConfigError::Store(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::TomlParse(e)
    }
}

/// Parameter persistence manager
pub struct ParamPersistence<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> ParamPersistence<'d> {
    /// Create a persistence manager over the params partition
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Load parameters from flash
    ///
    /// Tries TOML text first, falls back to the binary postcard block.
    pub async fn load(&mut self) -> Result<[RangefinderParams; MAX_RANGEFINDERS], ConfigError> {
        info!("Loading rangefinder parameters from flash...");

        match self.load_toml().await {
            Ok(params) => {
                info!("Loaded parameters from TOML");
                return Ok(params);
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                debug!("No TOML params found, trying binary format");
            }
            Err(e) => {
                warn!("Failed to load TOML params: {:?}, trying binary", e);
            }
        }

        self.load_binary().await
    }

    /// Write parameters to flash as a postcard block
    pub async fn save(
        &mut self,
        params: &[RangefinderParams; MAX_RANGEFINDERS],
    ) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_PARAM_STORE_SIZE];
        let bytes = ParamStore::new(*params).to_bytes(&mut buffer)?;

        self.storage
            .write(StorageKey::RangefinderParams, bytes)
            .await?;

        debug!("Wrote {} bytes of params to flash", bytes.len());
        Ok(())
    }

    async fn load_toml(&mut self) -> Result<[RangefinderParams; MAX_RANGEFINDERS], ConfigError> {
        let mut buffer = [0u8; MAX_TOML_SIZE];
        let len = self
            .storage
            .read(StorageKey::RangefinderParamsToml, &mut buffer)
            .await?;

        debug!("Read {} bytes of TOML from flash", len);

        let toml_str = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
        let params = parse_params(toml_str)?;

        log_params_summary(&params);
        Ok(params)
    }

    async fn load_binary(&mut self) -> Result<[RangefinderParams; MAX_RANGEFINDERS], ConfigError> {
        let mut buffer = [0u8; MAX_PARAM_STORE_SIZE];
        let len = self
            .storage
            .read(StorageKey::RangefinderParams, &mut buffer)
            .await?;

        debug!("Read {} bytes of binary params from flash", len);

        let store = ParamStore::from_bytes(&buffer[..len]).map_err(|e| {
            if e == StoreError::VersionMismatch {
                warn!("Param block version mismatch, ignoring");
            }
            e
        })?;

        log_params_summary(&store.slots);
        Ok(store.slots)
    }
}

/// Log a summary of the loaded parameters
pub fn log_params_summary(params: &[RangefinderParams; MAX_RANGEFINDERS]) {
    for (i, p) in params.iter().enumerate() {
        debug!(
            "  RNGFND{}: type={} pin={} function={} scaling={} offset={} range={}..{}cm",
            i + 1,
            p.rtype,
            p.pin,
            p.function,
            p.scaling,
            p.offset,
            p.min_cm,
            p.max_cm
        );
    }
}
