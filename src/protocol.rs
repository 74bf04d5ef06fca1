// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! A/B slot protocol surface.
//!
//! `AbSlotProtocol` mirrors the firmware function table one method per entry.
//! Raw integers arriving from the ABI (unbootable reason, boot mode, merge
//! status) are validated here and rejected with `InvalidEnumValue`.
//!
//! `AbSlotService` is the single owned instance that backs the table for one
//! boot session. It is created explicitly (`open` / `provision`) and threaded
//! through the boot sequence by the caller.

use crate::config::ProvisionConfig;
use crate::durability::{DurabilityBoundary, FlushOutcome, MetadataStorage};
use crate::error::Result;
use crate::store::{CurrentSlot, SlotStore};
use crate::types::block::MetadataBlock;
use crate::types::enums::{BootMode, MergeStatus, UnbootableReason};
use crate::types::slot::SlotRecord;

/// {9a7a7db4-614b-4a08-3df9-006f49b0d80c}
pub const AB_SLOT_PROTOCOL_GUID: (u32, u16, u16, [u8; 8]) = (
    0x9a7a_7db4,
    0x614b,
    0x4a08,
    [0x3d, 0xf9, 0x00, 0x6f, 0x49, 0xb0, 0xd8, 0x0c],
);

pub const AB_SLOT_PROTOCOL_VERSION: u32 = 0;

pub trait AbSlotProtocol {
    fn version(&self) -> u32 {
        AB_SLOT_PROTOCOL_VERSION
    }

    fn load_boot_data(&self) -> Result<MetadataBlock>;

    fn get_slot_info(&self, index: u8) -> Result<SlotRecord>;

    fn get_current_slot(&self) -> Result<SlotRecord>;

    fn get_next_slot(&mut self, mark_boot_attempt: bool) -> Result<SlotRecord>;

    fn set_active_slot(&mut self, index: u8) -> Result<()>;

    fn set_slot_unbootable(&mut self, index: u8, reason: u32) -> Result<()>;

    fn reinitialize(&mut self) -> Result<()>;

    fn get_boot_mode(&self) -> Result<BootMode>;

    fn set_boot_mode(&mut self, mode: u32) -> Result<()>;

    fn get_merge_status(&self) -> Result<MergeStatus>;

    fn set_merge_status(&mut self, status: u8) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

pub struct AbSlotService<S: MetadataStorage> {
    store: SlotStore,
    storage: S,
    durability: DurabilityBoundary,
}

impl<S: MetadataStorage> AbSlotService<S> {
    /// Loads the stored block. `MalformedMetadata` is returned as-is; whether
    /// to fall back to `provision` is the caller's decision.
    pub fn open(mut storage: S, current: CurrentSlot) -> Result<Self> {
        let mut durability = DurabilityBoundary::new();
        let block = durability.load(&mut storage)?;
        let store = SlotStore::with_metadata(block, current)?;
        tracing::debug!("slot metadata loaded ({} slots)", block.slot_count());
        Ok(Self {
            store,
            storage,
            durability,
        })
    }

    /// Starts a session on a freshly provisioned block. Nothing is written
    /// until `flush`.
    pub fn provision(storage: S, config: &ProvisionConfig, current: CurrentSlot) -> Result<Self> {
        let block = MetadataBlock::new(config)?;
        let store = SlotStore::with_metadata(block, current)?;
        tracing::info!(
            "provisioned slot metadata: {} slots, {} retries",
            config.slot_count,
            config.max_retries
        );
        Ok(Self {
            store,
            storage,
            durability: DurabilityBoundary::new(),
        })
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    /// Access for the boot-completion authority (`SlotStore::mark_successful`).
    pub fn store_mut(&mut self) -> &mut SlotStore {
        &mut self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// True when the working copy differs from what storage holds.
    pub fn is_dirty(&self) -> bool {
        match self.store.load() {
            Ok(block) => !self.durability.is_persisted(&block),
            Err(_) => false,
        }
    }

    pub fn flush_with_outcome(&mut self) -> Result<FlushOutcome> {
        let block = self.store.load()?;
        self.durability.flush(&block, &mut self.storage)
    }
}

impl<S: MetadataStorage> AbSlotProtocol for AbSlotService<S> {
    fn load_boot_data(&self) -> Result<MetadataBlock> {
        self.store.load()
    }

    fn get_slot_info(&self, index: u8) -> Result<SlotRecord> {
        self.store.get_slot(index)
    }

    fn get_current_slot(&self) -> Result<SlotRecord> {
        self.store.get_current_slot()
    }

    fn get_next_slot(&mut self, mark_boot_attempt: bool) -> Result<SlotRecord> {
        self.store.get_next_slot(mark_boot_attempt)
    }

    fn set_active_slot(&mut self, index: u8) -> Result<()> {
        self.store.set_active_slot(index)
    }

    fn set_slot_unbootable(&mut self, index: u8, reason: u32) -> Result<()> {
        let reason = UnbootableReason::try_from(reason)?;
        self.store.set_slot_unbootable(index, reason)
    }

    fn reinitialize(&mut self) -> Result<()> {
        self.store.reinitialize()
    }

    fn get_boot_mode(&self) -> Result<BootMode> {
        self.store.get_boot_mode()
    }

    fn set_boot_mode(&mut self, mode: u32) -> Result<()> {
        self.store.set_boot_mode_raw(mode)
    }

    fn get_merge_status(&self) -> Result<MergeStatus> {
        self.store.get_merge_status()
    }

    fn set_merge_status(&mut self, status: u8) -> Result<()> {
        self.store.set_merge_status_raw(status)
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_with_outcome().map(|_| ())
    }
}
