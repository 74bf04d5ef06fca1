// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::codec::{decode, encode};
use crate::config::ProvisionConfig;
use crate::durability::{FlushOutcome, MemoryStorage, MetadataStorage};
use crate::error::{MalformedReason, SlotError};
use crate::protocol::{AbSlotProtocol, AbSlotService};
use crate::store::CurrentSlot;
use crate::types::block::MetadataBlock;
use std::vec::Vec;

struct UnreadableStorage;

impl MetadataStorage for UnreadableStorage {
    type Error = &'static str;

    fn read_metadata_region(&mut self) -> Result<Vec<u8>, Self::Error> {
        Err("bus error")
    }

    fn write_metadata_region(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn provisioned_service() -> AbSlotService<MemoryStorage> {
    AbSlotService::provision(MemoryStorage::erased(64), &ProvisionConfig::default(), CurrentSlot::Index(0))
        .unwrap()
}

#[test]
fn test_open_erased_region_is_malformed() {
    let res = AbSlotService::open(MemoryStorage::erased(64), CurrentSlot::Unknown);
    assert!(matches!(
        res,
        Err(SlotError::MalformedMetadata(MalformedReason::BadMagic))
    ));
}

#[test]
fn test_open_read_failure() {
    let res = AbSlotService::open(UnreadableStorage, CurrentSlot::Unknown);
    assert!(matches!(res, Err(SlotError::StorageReadFailure)));
}

#[test]
fn test_nothing_written_before_flush() {
    let mut service = provisioned_service();
    service.get_next_slot(true).unwrap();
    assert_eq!(service.storage().writes(), 0);
    assert!(service.is_dirty());
}

#[test]
fn test_flush_is_idempotent() {
    let mut service = provisioned_service();
    assert_eq!(service.flush_with_outcome().unwrap(), FlushOutcome::Written);
    assert_eq!(service.flush_with_outcome().unwrap(), FlushOutcome::Unchanged);
    assert_eq!(service.storage().writes(), 1);
    assert!(!service.is_dirty());

    service.set_active_slot(1).unwrap();
    assert_eq!(service.flush_with_outcome().unwrap(), FlushOutcome::Written);
    assert_eq!(service.storage().writes(), 2);
}

#[test]
fn test_reopened_block_matches_flushed_state() {
    let mut service = provisioned_service();
    service.set_active_slot(1).unwrap();
    service.get_next_slot(true).unwrap();
    service.flush().unwrap();
    let flushed = service.load_boot_data().unwrap();

    let storage = service.into_storage();
    let mut reopened = AbSlotService::open(storage, CurrentSlot::Index(1)).unwrap();
    assert_eq!(reopened.load_boot_data().unwrap(), flushed);
    assert!(!reopened.is_dirty());

    // Storage already holds this exact block.
    assert_eq!(reopened.flush_with_outcome().unwrap(), FlushOutcome::Unchanged);
}

#[test]
fn test_write_failure_keeps_state_and_storage() {
    let mut service = provisioned_service();
    service.flush().unwrap();
    let stored = service.storage().contents().to_vec();

    service.set_active_slot(1).unwrap();
    let working = service.load_boot_data().unwrap();

    let mut storage = service.into_storage();
    storage.set_fail_writes(true);
    let mut service = AbSlotService::open(storage, CurrentSlot::Unknown).unwrap();
    service.set_active_slot(1).unwrap();
    assert_eq!(service.flush(), Err(SlotError::StorageWriteFailure));

    assert_eq!(service.storage().contents(), &stored[..]);
    assert_eq!(service.load_boot_data().unwrap(), working);
    assert!(service.is_dirty());
}

#[test]
fn test_failed_first_flush_leaves_region_erased() {
    let mut storage = MemoryStorage::erased(64);
    storage.set_fail_writes(true);
    let mut service =
        AbSlotService::provision(storage, &ProvisionConfig::default(), CurrentSlot::Unknown).unwrap();
    assert_eq!(service.flush(), Err(SlotError::StorageWriteFailure));

    let storage = service.into_storage();
    assert_eq!(storage.writes(), 0);
    assert!(storage.contents().iter().all(|b| *b == 0xFF));
}

#[test]
fn test_encoded_block_survives_storage() {
    let block = MetadataBlock::new(&ProvisionConfig::default()).unwrap();
    let mut storage = MemoryStorage::erased(64);
    storage.write_metadata_region(&encode(&block)).unwrap();
    let bytes = storage.read_metadata_region().unwrap();
    assert_eq!(decode(&bytes).unwrap(), block);
}

#[test]
fn test_region_too_small() {
    let mut service =
        AbSlotService::provision(MemoryStorage::erased(8), &ProvisionConfig::default(), CurrentSlot::Unknown)
            .unwrap();
    assert_eq!(service.flush(), Err(SlotError::StorageWriteFailure));
}

#[test]
fn test_unchanged_flush_after_open_writes_nothing() {
    let mut service = provisioned_service();
    service.set_active_slot(1).unwrap();
    service.flush().unwrap();

    let storage = service.into_storage();
    let stored = storage.contents().to_vec();
    let mut reopened = AbSlotService::open(MemoryStorage::with_contents(&stored), CurrentSlot::Unknown).unwrap();
    reopened.flush().unwrap();
    assert_eq!(reopened.storage().writes(), 0);
}

#[test]
fn test_open_rejects_dirty_reserved_bytes() {
    let mut bytes = encode(&MetadataBlock::new(&ProvisionConfig::default()).unwrap());
    bytes[10] = 0xAA;
    let body = bytes.len() - 4;
    let crc = crc32fast::hash(&bytes[..body]);
    bytes[body..].copy_from_slice(&crc.to_le_bytes());

    let res = AbSlotService::open(MemoryStorage::with_contents(&bytes), CurrentSlot::Unknown);
    assert!(matches!(
        res,
        Err(SlotError::MalformedMetadata(MalformedReason::Field { kind: "reserved", .. }))
    ));
}
