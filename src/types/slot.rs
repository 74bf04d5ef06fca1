// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-slot record.

use serde::{Deserialize, Serialize};

use crate::config::MAX_PRIORITY;
use crate::types::enums::UnbootableReason;
use crate::types::id::Suffix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub suffix: Suffix,
    pub priority: u8,
    pub tries: u8,
    pub successful: bool,
    pub unbootable_reason: UnbootableReason,
}

impl SlotRecord {
    /// Filler for array entries past `slot_count`.
    pub(crate) const EMPTY: SlotRecord = SlotRecord {
        suffix: Suffix(0),
        priority: 0,
        tries: 0,
        successful: false,
        unbootable_reason: UnbootableReason::Unknown,
    };

    /// Record as written by provisioning and reinitialization.
    pub fn fresh(suffix: Suffix, max_retries: u8) -> Self {
        Self {
            suffix,
            priority: MAX_PRIORITY,
            tries: max_retries,
            successful: false,
            unbootable_reason: UnbootableReason::Unknown,
        }
    }

    pub fn is_bootable(&self) -> bool {
        self.priority > 0
    }
}
