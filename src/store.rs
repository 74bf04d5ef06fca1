// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Slot Store: the session's working copy of the metadata block.
//!
//! Every mutation runs against a scratch copy of the block, is re-validated
//! with `MetadataBlock::check_invariants`, and only then replaces the working
//! copy. A failed mutation leaves the store exactly as it was.

use crate::error::{Result, SlotError};
use crate::types::block::MetadataBlock;
use crate::types::id::Suffix;
use crate::types::slot::SlotRecord;

/// The slot firmware is executing from, fixed when the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrentSlot {
    /// Started from a non-A/B path, or the loader did not say.
    Unknown,
    Index(u8),
    Suffix(Suffix),
}

#[derive(Debug)]
pub struct SlotStore {
    working: Option<MetadataBlock>,
    current: CurrentSlot,
}

impl SlotStore {
    pub fn new(current: CurrentSlot) -> Self {
        Self {
            working: None,
            current,
        }
    }

    pub fn with_metadata(block: MetadataBlock, current: CurrentSlot) -> Result<Self> {
        let mut store = Self::new(current);
        store.install(block)?;
        Ok(store)
    }

    /// Replaces the working copy with a decoded or freshly provisioned block.
    pub fn install(&mut self, block: MetadataBlock) -> Result<()> {
        block.check_invariants()?;
        self.working = Some(block);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.working.is_some()
    }

    // --- Read APIs ---

    /// Independent copy of the working block.
    pub fn load(&self) -> Result<MetadataBlock> {
        self.working().copied()
    }

    pub fn get_slot(&self, index: u8) -> Result<SlotRecord> {
        self.working()?.slot(index).copied()
    }

    pub fn current_index(&self) -> Result<u8> {
        let block = self.working()?;
        match self.current {
            CurrentSlot::Index(i) if i < block.slot_count() => Ok(i),
            CurrentSlot::Suffix(s) => block.index_of(s).ok_or(SlotError::NoCurrentSlot),
            _ => Err(SlotError::NoCurrentSlot),
        }
    }

    pub fn get_current_slot(&self) -> Result<SlotRecord> {
        let index = self.current_index()?;
        self.get_slot(index)
    }

    /// Privileged boot-completion hook: records that slot `index` booted to
    /// completion. Priority and tries are left untouched.
    pub fn mark_successful(&mut self, index: u8) -> Result<SlotRecord> {
        let record = self.mutate(index, |slot| slot.successful = true)?;
        tracing::info!("slot {} marked successful", record.suffix);
        Ok(record)
    }

    // --- Write Logic ---

    pub(crate) fn working(&self) -> Result<&MetadataBlock> {
        self.working.as_ref().ok_or(SlotError::NotInitialized)
    }

    /// Applies `f` to a scratch copy of the block and commits it if the
    /// result still satisfies the block invariants.
    pub(crate) fn mutate_block<T>(
        &mut self,
        f: impl FnOnce(&mut MetadataBlock) -> Result<T>,
    ) -> Result<T> {
        let mut scratch = *self.working()?;
        let out = f(&mut scratch)?;
        scratch.check_invariants()?;
        self.working = Some(scratch);
        Ok(out)
    }

    /// Single-slot form of `mutate_block`. Returns the committed record.
    pub(crate) fn mutate(&mut self, index: u8, f: impl FnOnce(&mut SlotRecord)) -> Result<SlotRecord> {
        self.mutate_block(|block| {
            let slot = block.slot_mut(index)?;
            f(slot);
            Ok(*slot)
        })
    }
}
