// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

use crate::error::{Result, SlotError};

/// Highest slot count the on-disk layout supports.
pub const MAX_SLOTS: usize = 4;

/// Priority ceiling. Matches the 4-bit priority field of Android's boot control block.
pub const MAX_PRIORITY: u8 = 15;

/// Retry budget handed out on activation when provisioning does not say otherwise.
pub const DEFAULT_MAX_RETRIES: u8 = 7;

/// Magic prefix of the encoded metadata block.
pub const MAGIC: &[u8; 4] = b"ABSM";

/// Current schema version of the encoded metadata block.
pub const SCHEMA_VERSION: u8 = 1;

/// Suffix of slot 0. Slot `i` is `'a' + i`.
pub const FIRST_SUFFIX: char = 'a';

/// Parameters fixed at first-boot provisioning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub slot_count: u8,
    pub max_retries: u8,
    pub tracks_unbootable_reasons: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            slot_count: 2,
            max_retries: DEFAULT_MAX_RETRIES,
            tracks_unbootable_reasons: true,
        }
    }
}

impl ProvisionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 || self.slot_count as usize > MAX_SLOTS {
            return Err(SlotError::InvalidConfig("slot count must be between 1 and 4"));
        }
        // A zero retry budget would retire every slot on its first attempt.
        if self.max_retries == 0 {
            return Err(SlotError::InvalidConfig("max retries must be non-zero"));
        }
        Ok(())
    }
}
