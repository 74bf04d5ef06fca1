// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Slot Arbiter.
//!
//! Decides which slot boots next and drives the per-slot state machine:
//!
//! ```text
//!   fresh (priority > 0, tries = max_retries)
//!     | marked attempt, !successful     -> tries - 1
//!     | tries hits 0                    -> unbootable (NoMoreTries)
//!     | set_slot_unbootable             -> unbootable (given reason)
//!     | set_active_slot                 -> fresh, strictly highest priority
//!   successful slots ignore marked attempts
//! ```
//!
//! The free functions are pure over a `MetadataBlock`; the `SlotStore`
//! methods below wrap them in the store's validated mutation path.

use crate::config::{MAX_PRIORITY, MAX_SLOTS};
use crate::error::{Result, SlotError};
use crate::store::SlotStore;
use crate::types::block::MetadataBlock;
use crate::types::enums::UnbootableReason;
use crate::types::slot::SlotRecord;

/// Index of the slot that should boot next: highest priority wins, lowest
/// index breaks ties.
pub fn select_next(block: &MetadataBlock) -> Result<u8> {
    let mut best: Option<(u8, u8)> = None;
    for (i, slot) in block.slots().iter().enumerate() {
        if !slot.is_bootable() {
            continue;
        }
        // Strict comparison keeps the earlier (lower) index on ties.
        if best.map_or(true, |(_, p)| slot.priority > p) {
            best = Some((i as u8, slot.priority));
        }
    }
    best.map(|(i, _)| i).ok_or(SlotError::NoBootableSlot)
}

/// Consumes one boot attempt from `slot`. Returns `true` if the slot ran out
/// of tries and was retired.
pub fn consume_attempt(slot: &mut SlotRecord, tracks_reasons: bool) -> bool {
    if slot.successful {
        return false;
    }
    slot.tries = slot.tries.saturating_sub(1);
    if slot.tries == 0 {
        slot.priority = 0;
        if tracks_reasons {
            slot.unbootable_reason = UnbootableReason::NoMoreTries;
        }
        return true;
    }
    false
}

/// Makes slot `index` the strict priority maximum with a fresh retry budget.
pub fn activate(block: &mut MetadataBlock, index: u8) -> Result<()> {
    block.check_index(index)?;
    let count = block.slot_count() as usize;
    let target_idx = index as usize;

    let max_in_use = block.slots().iter().map(|s| s.priority).max().unwrap_or(0);
    let target = max_in_use.saturating_add(1).min(MAX_PRIORITY);

    let others_max = block
        .slots()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_idx)
        .map(|(_, s)| s.priority)
        .max()
        .unwrap_or(0);

    // Saturated: push every other bootable slot down by the same step so the
    // target ends up strictly highest. Bootable slots never drop below 1; a
    // slot clamped at the floor lifts the ones above it just enough to keep
    // their relative order.
    if others_max >= target {
        let step = others_max - target + 1;
        let mut order = [0usize; MAX_SLOTS];
        let mut n = 0;
        for (i, slot) in block.slots[..count].iter().enumerate() {
            if i != target_idx && slot.is_bootable() {
                order[n] = i;
                n += 1;
            }
        }
        let order = &mut order[..n];
        order.sort_unstable_by_key(|&i| (block.slots[i].priority, i));

        let mut below: Option<(u8, u8)> = None; // (original, lowered)
        for &i in order.iter() {
            let original = block.slots[i].priority;
            let mut lowered = original.saturating_sub(step).max(1);
            if let Some((prev_original, prev_lowered)) = below {
                if original > prev_original {
                    lowered = lowered.max(prev_lowered + 1);
                } else {
                    lowered = prev_lowered;
                }
            }
            below = Some((original, lowered));
            block.slots[i].priority = lowered;
        }
    }

    let max_retries = block.max_retries();
    let slot = &mut block.slots[target_idx];
    slot.priority = target;
    slot.tries = max_retries;
    slot.successful = false;
    slot.unbootable_reason = UnbootableReason::Unknown;
    Ok(())
}

impl SlotStore {
    /// Picks the next boot target. With `mark_attempt`, one try is consumed
    /// from the selected slot (unless it already booted successfully) and the
    /// updated record is returned.
    pub fn get_next_slot(&mut self, mark_attempt: bool) -> Result<SlotRecord> {
        let block = self.working()?;
        let index = select_next(block)?;
        let tracks = block.tracks_unbootable_reasons();
        tracing::debug!(
            "arbitration selected slot {} (priority {})",
            block.slots()[index as usize].suffix,
            block.slots()[index as usize].priority
        );

        if !mark_attempt {
            return self.get_slot(index);
        }

        let mut retired = false;
        let record = self.mutate(index, |slot| retired = consume_attempt(slot, tracks))?;
        if retired {
            tracing::info!("slot {} out of tries, marked unbootable", record.suffix);
        } else {
            tracing::debug!("slot {} boot attempt marked, {} tries left", record.suffix, record.tries);
        }
        Ok(record)
    }

    pub fn set_active_slot(&mut self, index: u8) -> Result<()> {
        self.mutate_block(|block| activate(block, index))?;
        let record = self.get_slot(index)?;
        tracing::info!("slot {} set active (priority {})", record.suffix, record.priority);
        Ok(())
    }

    /// Retires slot `index` regardless of its success flag. `tries` is kept.
    pub fn set_slot_unbootable(&mut self, index: u8, reason: UnbootableReason) -> Result<()> {
        let block = self.working()?;
        block.check_index(index)?;
        if block.tracks_unbootable_reasons() && reason == UnbootableReason::Unknown {
            return Err(SlotError::InvalidEnumValue {
                kind: "unbootable reason",
                value: reason as u32,
            });
        }

        let record = self.mutate(index, |slot| {
            slot.priority = 0;
            slot.unbootable_reason = reason;
        })?;
        tracing::info!("slot {} marked unbootable: {}", record.suffix, reason);
        Ok(())
    }

    /// Resets every slot to its provisioning default and clears the merge status.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.mutate_block(|block| {
            block.reset_slots();
            Ok(())
        })?;
        tracing::info!("slot metadata reinitialized");
        Ok(())
    }
}
