// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The device-wide metadata block.

use crate::config::{ProvisionConfig, MAX_SLOTS};
use crate::error::{MalformedReason, Result, SlotError};
use crate::types::enums::{BootMode, MergeStatus, UnbootableReason};
use crate::types::id::Suffix;
use crate::types::slot::SlotRecord;

/// Singleton slot metadata. Entries of `slots` past `slot_count` are always
/// `SlotRecord::EMPTY` and never observable.
#[derive(Clone, Copy, Debug)]
pub struct MetadataBlock {
    pub(crate) slot_count: u8,
    pub(crate) max_retries: u8,
    pub(crate) tracks_unbootable_reasons: bool,
    pub(crate) merge_status: MergeStatus,
    pub(crate) boot_mode: BootMode,
    pub(crate) slots: [SlotRecord; MAX_SLOTS],
}

impl MetadataBlock {
    /// Fresh block for first-boot provisioning.
    pub fn new(config: &ProvisionConfig) -> Result<Self> {
        config.validate()?;
        let mut block = Self {
            slot_count: config.slot_count,
            max_retries: config.max_retries,
            tracks_unbootable_reasons: config.tracks_unbootable_reasons,
            merge_status: MergeStatus::None,
            boot_mode: BootMode::Normal,
            slots: [SlotRecord::EMPTY; MAX_SLOTS],
        };
        for i in 0..config.slot_count {
            block.slots[i as usize] = SlotRecord::fresh(Suffix::for_index(i), config.max_retries);
        }
        Ok(block)
    }

    // --- Read APIs ---

    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn tracks_unbootable_reasons(&self) -> bool {
        self.tracks_unbootable_reasons
    }

    pub fn merge_status(&self) -> MergeStatus {
        self.merge_status
    }

    pub fn boot_mode(&self) -> BootMode {
        self.boot_mode
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots[..self.slot_count as usize]
    }

    pub fn slot(&self, index: u8) -> Result<&SlotRecord> {
        self.check_index(index)?;
        Ok(&self.slots[index as usize])
    }

    pub fn index_of(&self, suffix: Suffix) -> Option<u8> {
        self.slots().iter().position(|s| s.suffix == suffix).map(|i| i as u8)
    }

    pub fn config(&self) -> ProvisionConfig {
        ProvisionConfig {
            slot_count: self.slot_count,
            max_retries: self.max_retries,
            tracks_unbootable_reasons: self.tracks_unbootable_reasons,
        }
    }

    // --- Write Logic (crate only, callers go through the store) ---

    pub(crate) fn check_index(&self, index: u8) -> Result<()> {
        if index >= self.slot_count {
            return Err(SlotError::InvalidIndex {
                index,
                slot_count: self.slot_count,
            });
        }
        Ok(())
    }

    pub(crate) fn slot_mut(&mut self, index: u8) -> Result<&mut SlotRecord> {
        self.check_index(index)?;
        Ok(&mut self.slots[index as usize])
    }

    /// Resets every record to its provisioning default and clears the merge
    /// status. Suffixes and `slot_count` are kept.
    pub(crate) fn reset_slots(&mut self) {
        let max_retries = self.max_retries;
        for slot in self.slots[..self.slot_count as usize].iter_mut() {
            *slot = SlotRecord::fresh(slot.suffix, max_retries);
        }
        self.merge_status = MergeStatus::None;
    }

    // --- Invariant Checker ---

    /// Checks the structural invariants every stored or committed block must hold.
    pub fn check_invariants(&self) -> core::result::Result<(), MalformedReason> {
        if self.slot_count == 0 || self.slot_count as usize > MAX_SLOTS {
            return Err(MalformedReason::SlotCount(self.slot_count));
        }

        for (i, slot) in self.slots().iter().enumerate() {
            if !slot.suffix.is_valid() {
                return Err(MalformedReason::Field {
                    kind: "suffix",
                    value: slot.suffix.0,
                });
            }
            if self.slots()[..i].iter().any(|prev| prev.suffix == slot.suffix) {
                return Err(MalformedReason::DuplicateSuffix(i as u8));
            }
            if self.tracks_unbootable_reasons
                && !slot.is_bootable()
                && slot.unbootable_reason == UnbootableReason::Unknown
            {
                return Err(MalformedReason::MissingReason(i as u8));
            }
        }

        if self.slots[self.slot_count as usize..]
            .iter()
            .any(|s| *s != SlotRecord::EMPTY)
        {
            return Err(MalformedReason::SlotCount(self.slot_count));
        }

        Ok(())
    }
}

impl PartialEq for MetadataBlock {
    fn eq(&self, other: &Self) -> bool {
        self.slot_count == other.slot_count
            && self.max_retries == other.max_retries
            && self.tracks_unbootable_reasons == other.tracks_unbootable_reasons
            && self.merge_status == other.merge_status
            && self.boot_mode == other.boot_mode
            && self.slots() == other.slots()
    }
}

impl Eq for MetadataBlock {}
