//! Persistent parameter storage
//!
//! Chip HALs back [`FlashStorage`] with a wear-levelled map kept in a flash
//! partition. Items are addressed by a one-byte [`StorageKey`].

/// Items kept in the params partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Postcard-encoded `ParamStore`
    RangefinderParams = 0,
    /// Hand-edited TOML parameter file
    RangefinderParamsToml = 1,
}

impl StorageKey {
    const ALL: [StorageKey; 2] = [StorageKey::RangefinderParams, StorageKey::RangefinderParamsToml];

    /// On-flash byte for this key
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Key stored as `value`, if any
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_u8() == value)
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Erase or program failed
    Flash,
    /// Map is corrupt or the item could not be stored
    Storage,
    /// No item under the key
    NotFound,
    /// Item does not fit the caller's buffer
    BufferTooSmall,
}

/// Key-value store for the params partition
pub trait FlashStorage {
    /// Copy the item stored under `key` into `buffer`
    ///
    /// Returns the item length.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Store `data` under `key`, replacing any earlier item
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
mod map_key {
    use sequential_storage::map::{Key, SerializationError};

    use super::StorageKey;

    impl Key for StorageKey {
        fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
            let byte = buffer
                .first_mut()
                .ok_or(SerializationError::BufferTooSmall)?;
            *byte = self.as_u8();
            Ok(1)
        }

        fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
            let byte = buffer.first().ok_or(SerializationError::BufferTooSmall)?;
            let key = StorageKey::from_u8(*byte).ok_or(SerializationError::InvalidFormat)?;
            Ok((key, 1))
        }
    }
}
