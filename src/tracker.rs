// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Merge status and boot mode bookkeeping.
//!
//! Both values live in the metadata block but take no part in arbitration.

use crate::error::Result;
use crate::store::SlotStore;
use crate::types::enums::{BootMode, MergeStatus};

impl SlotStore {
    pub fn get_merge_status(&self) -> Result<MergeStatus> {
        Ok(self.working()?.merge_status())
    }

    pub fn set_merge_status(&mut self, status: MergeStatus) -> Result<()> {
        self.mutate_block(|block| {
            block.merge_status = status;
            Ok(())
        })?;
        tracing::debug!("merge status set to {}", status);
        Ok(())
    }

    /// Protocol-boundary form; rejects values outside `MergeStatus`.
    pub fn set_merge_status_raw(&mut self, raw: u8) -> Result<()> {
        let status = MergeStatus::try_from(raw)?;
        self.set_merge_status(status)
    }

    pub fn get_boot_mode(&self) -> Result<BootMode> {
        Ok(self.working()?.boot_mode())
    }

    pub fn set_boot_mode(&mut self, mode: BootMode) -> Result<()> {
        self.mutate_block(|block| {
            block.boot_mode = mode;
            Ok(())
        })?;
        tracing::debug!("boot mode set to {}", mode);
        Ok(())
    }

    /// Protocol-boundary form; rejects values outside `BootMode`.
    pub fn set_boot_mode_raw(&mut self, raw: u32) -> Result<()> {
        let mode = BootMode::try_from(raw)?;
        self.set_boot_mode(mode)
    }
}
