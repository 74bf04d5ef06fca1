// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canned metadata files for tests and demos.

use crate::error::Result;
use crate::file::FileStorage;
use abslot_kernel::{
    AbSlotProtocol, AbSlotService, CurrentSlot, MergeStatus, ProvisionConfig, UnbootableReason,
};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FixturePaths {
    /// Freshly provisioned, two slots, default retries.
    pub fresh: PathBuf,
    /// Running from `a` (successful), update staged in `b`, snapshot pending.
    pub updated: PathBuf,
    /// Both slots retired.
    pub exhausted: PathBuf,
    /// Valid file envelope around a block that fails its own checksum.
    pub corrupt: PathBuf,
}

fn provision(path: &Path) -> Result<AbSlotService<FileStorage>> {
    Ok(AbSlotService::provision(
        FileStorage::new(path),
        &ProvisionConfig::default(),
        CurrentSlot::Index(0),
    )?)
}

pub fn generate_fixtures(dir: &Path) -> Result<FixturePaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    // 1. fresh.bin
    let fresh = dir.join("fresh.bin");
    provision(&fresh)?.flush()?;

    // 2. updated.bin
    let updated = dir.join("updated.bin");
    let mut service = provision(&updated)?;
    service.store_mut().mark_successful(0)?;
    service.set_active_slot(1)?;
    service.set_merge_status(MergeStatus::Snapshotted as u8)?;
    service.flush()?;

    // 3. exhausted.bin
    let exhausted = dir.join("exhausted.bin");
    let mut service = provision(&exhausted)?;
    service.set_slot_unbootable(0, UnbootableReason::VerificationFailure as u32)?;
    while service.get_next_slot(true)?.is_bootable() {}
    service.flush()?;

    // 4. corrupt.bin
    let corrupt = dir.join("corrupt.bin");
    let mut bytes = FileStorage::new(&fresh).read_region()?;
    if let Some(last) = bytes.last_mut() {
        *last ^= 0xFF;
    }
    FileStorage::new(&corrupt).write_region(&bytes)?;

    Ok(FixturePaths {
        fresh,
        updated,
        exhausted,
        corrupt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abslot_kernel::{MalformedReason, SlotError};
    use tempfile::tempdir;

    #[test]
    fn test_fixtures_load() {
        let dir = tempdir().unwrap();
        let paths = generate_fixtures(dir.path()).unwrap();

        let fresh = AbSlotService::open(FileStorage::new(&paths.fresh), CurrentSlot::Unknown).unwrap();
        assert_eq!(fresh.get_slot_info(1).unwrap().tries, 7);

        let mut updated = AbSlotService::open(FileStorage::new(&paths.updated), CurrentSlot::Unknown).unwrap();
        assert_eq!(updated.get_next_slot(false).unwrap().suffix.as_char(), Some('b'));
        assert_eq!(updated.get_merge_status().unwrap(), MergeStatus::Snapshotted);
        assert!(updated.get_slot_info(0).unwrap().successful);

        let mut exhausted =
            AbSlotService::open(FileStorage::new(&paths.exhausted), CurrentSlot::Unknown).unwrap();
        assert_eq!(exhausted.get_next_slot(false), Err(SlotError::NoBootableSlot));
        assert_eq!(
            exhausted.get_slot_info(1).unwrap().unbootable_reason,
            UnbootableReason::NoMoreTries
        );

        let corrupt = AbSlotService::open(FileStorage::new(&paths.corrupt), CurrentSlot::Unknown);
        assert!(matches!(
            corrupt,
            Err(SlotError::MalformedMetadata(MalformedReason::Checksum { .. }))
        ));
    }
}
