//! Params partition on the RP2040's QSPI flash
//!
//! The top 64K of the 2MB part hold a sequential-storage map; `memory.x`
//! keeps the firmware image out of it.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use fathom_hal::flash::{FlashError, StorageKey};

/// Pico flash size
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Size of the params partition at the end of flash
pub const PARAMS_PARTITION_SIZE: usize = 64 * 1024;

/// Flash offsets of the params partition
pub const PARAMS_RANGE: Range<u32> = (FLASH_SIZE - PARAMS_PARTITION_SIZE) as u32..FLASH_SIZE as u32;

/// Largest item the map will read or write, TOML text included
pub const MAX_ITEM_SIZE: usize = 2048;

/// [`fathom_hal::FlashStorage`] over the params partition
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Take the flash peripheral and a DMA channel for reads
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> fathom_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut scratch = [0u8; MAX_ITEM_SIZE];

        let item = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            PARAMS_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)?
        .ok_or(FlashError::NotFound)?;

        buffer
            .get_mut(..item.len())
            .ok_or(FlashError::BufferTooSmall)?
            .copy_from_slice(item);
        Ok(item.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.len() > MAX_ITEM_SIZE {
            return Err(FlashError::BufferTooSmall);
        }
        let mut scratch = [0u8; MAX_ITEM_SIZE];

        map::store_item(
            &mut self.flash,
            PARAMS_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}
