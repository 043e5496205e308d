//! Persisted parameter block
//!
//! The complete set of slot parameters as written to flash. Encoded with
//! postcard when the `serde` feature (on by default) is enabled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::params::{RangefinderParams, MAX_RANGEFINDERS};

/// Current parameter block version
pub const PARAM_STORE_VERSION: u8 = 1;

/// Upper bound on the encoded size of a [`ParamStore`]
pub const MAX_PARAM_STORE_SIZE: usize = 128;

/// Errors from encoding or decoding a parameter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Block was written by an incompatible version
    VersionMismatch,
}

/// Parameters for every slot, with a format version
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamStore {
    /// Format version for compatibility checks
    pub version: u8,
    /// One parameter block per slot
    pub slots: [RangefinderParams; MAX_RANGEFINDERS],
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new([RangefinderParams::default(); MAX_RANGEFINDERS])
    }
}

impl ParamStore {
    /// Wrap slot parameters with the current version
    pub fn new(slots: [RangefinderParams; MAX_RANGEFINDERS]) -> Self {
        Self {
            version: PARAM_STORE_VERSION,
            slots,
        }
    }

    /// Check the block was written by this format version
    pub fn is_valid(&self) -> bool {
        self.version == PARAM_STORE_VERSION
    }

    /// Encode into `buffer`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], StoreError> {
        postcard::to_slice(self, buffer).map_err(|_| StoreError::Serialize)
    }

    /// Decode and version-check a block
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let store: ParamStore = postcard::from_bytes(bytes).map_err(|_| StoreError::Deserialize)?;
        if !store.is_valid() {
            return Err(StoreError::VersionMismatch);
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "serde")]
    use crate::config::{DistanceFunction, RangefinderType};

    #[test]
    fn test_default_store_is_valid() {
        let store = ParamStore::default();
        assert!(store.is_valid());
        assert_eq!(store.slots[0], RangefinderParams::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_version_mismatch_rejected() {
        let mut store = ParamStore::new([RangefinderParams::analog(26); MAX_RANGEFINDERS]);
        store.version = PARAM_STORE_VERSION + 1;

        let mut buffer = [0u8; MAX_PARAM_STORE_SIZE];
        let bytes = store.to_bytes(&mut buffer).unwrap();
        assert_eq!(
            ParamStore::from_bytes(bytes),
            Err(StoreError::VersionMismatch)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_truncated_block_rejected() {
        let store = ParamStore::new([RangefinderParams::analog(27); MAX_RANGEFINDERS]);
        let mut buffer = [0u8; MAX_PARAM_STORE_SIZE];
        let len = store.to_bytes(&mut buffer).unwrap().len();
        assert_eq!(
            ParamStore::from_bytes(&buffer[..len / 2]),
            Err(StoreError::Deserialize)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_saved_block_decodes_unchanged() {
        let mut slots = [RangefinderParams::default(); MAX_RANGEFINDERS];
        slots[0] = RangefinderParams {
            function: DistanceFunction::Hyperbolic,
            scaling: 0.8,
            offset: 0.25,
            ratiometric: false,
            min_cm: 10,
            max_cm: i16::MIN,
            powersave_range: i16::MAX,
            stop_pin: 22,
            ground_clearance_cm: 25,
            ..RangefinderParams::analog(26)
        };
        slots[0].pos_offset.z = 1.5;
        slots[1].rtype = RangefinderType::Analog;
        slots[1].pin = 27;
        slots[1].function = DistanceFunction::Inverted;
        let store = ParamStore::new(slots);

        let mut buffer = [0u8; MAX_PARAM_STORE_SIZE];
        let bytes = store.to_bytes(&mut buffer).unwrap();
        let decoded = ParamStore::from_bytes(bytes).unwrap();

        assert_eq!(decoded, store);
        assert_eq!(decoded.slots[0].max_cm, i16::MIN);
        assert_eq!(decoded.slots[0].pos_offset.z, 1.5);
        assert_eq!(decoded.slots[0].function, DistanceFunction::Hyperbolic);
    }
}
