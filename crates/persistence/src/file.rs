// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `MetadataStorage` over a host file.
//!
//! Writes go to `<path>.tmp`, are synced, and then replace `<path>` by rename.
//! The replaced file is kept as `<path>.prev` so a primary that fails its
//! envelope check can fall back to the last good copy.

use crate::envelope;
use crate::error::{PersistenceError, Result};
use abslot_kernel::MetadataStorage;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn read_envelope(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    envelope::open(BufReader::new(file))
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, ".prev")
    }

    fn tmp_path(&self) -> PathBuf {
        with_suffix(&self.path, ".tmp")
    }

    pub fn exists(&self) -> bool {
        self.path.exists() || self.backup_path().exists()
    }

    /// Payload of the primary file, or of the backup if the primary is
    /// missing or damaged. When both fail the primary's error is returned.
    pub fn read_region(&self) -> Result<Vec<u8>> {
        let primary_err = match read_envelope(&self.path) {
            Ok(payload) => return Ok(payload),
            Err(e) => e,
        };

        let backup = self.backup_path();
        match read_envelope(&backup) {
            Ok(payload) => {
                tracing::warn!(
                    "{} unreadable ({}), using {}",
                    self.path.display(),
                    primary_err,
                    backup.display()
                );
                Ok(payload)
            }
            Err(_) => Err(primary_err),
        }
    }

    pub fn write_region(&self, payload: &[u8]) -> Result<()> {
        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&envelope::seal(payload))?;
            file.sync_all()?;
        }

        if self.path.exists() {
            // Only a primary that still verifies is worth keeping as backup.
            if read_envelope(&self.path).is_ok() {
                fs::rename(&self.path, self.backup_path())?;
            } else {
                tracing::warn!("discarding damaged {}", self.path.display());
            }
        }
        fs::rename(&tmp, &self.path)?;
        sync_parent(&self.path);

        tracing::debug!("wrote {} ({} bytes)", self.path.display(), payload.len());
        Ok(())
    }
}

// Directory sync is best effort: not every platform lets a directory be opened.
fn sync_parent(path: &Path) {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return;
    };
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

impl MetadataStorage for FileStorage {
    type Error = PersistenceError;

    fn read_metadata_region(&mut self) -> Result<Vec<u8>> {
        self.read_region()
    }

    fn write_metadata_region(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_region(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abslot_kernel::codec::{decode, encode};
    use abslot_kernel::{
        AbSlotProtocol, AbSlotService, CurrentSlot, MetadataBlock, ProvisionConfig, SlotError,
    };
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("slots.bin"));
        assert!(!storage.exists());

        storage.write_region(b"first").unwrap();
        assert_eq!(storage.read_region().unwrap(), b"first".to_vec());
        assert!(!storage.backup_path().exists());

        storage.write_region(b"second").unwrap();
        assert_eq!(storage.read_region().unwrap(), b"second".to_vec());
        assert_eq!(read_envelope(&storage.backup_path()).unwrap(), b"first".to_vec());
        assert!(!storage.tmp_path().exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.bin"));
        let err = storage.read_region().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_falls_back_to_backup() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("slots.bin"));
        storage.write_region(b"good").unwrap();
        storage.write_region(b"newer").unwrap();

        // Tear the primary.
        let bytes = fs::read(storage.path()).unwrap();
        fs::write(storage.path(), &bytes[..bytes.len() - 3]).unwrap();

        assert_eq!(storage.read_region().unwrap(), b"good".to_vec());
    }

    #[test]
    fn test_both_copies_damaged() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("slots.bin"));
        fs::write(storage.path(), b"garbage-garbage-garbage").unwrap();
        assert!(matches!(storage.read_region(), Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_damaged_primary_not_rotated() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("slots.bin"));
        storage.write_region(b"good").unwrap();
        storage.write_region(b"newer").unwrap();
        fs::write(storage.path(), b"junk").unwrap();

        storage.write_region(b"latest").unwrap();
        assert_eq!(storage.read_region().unwrap(), b"latest".to_vec());
        assert_eq!(read_envelope(&storage.backup_path()).unwrap(), b"good".to_vec());
    }

    #[test]
    fn test_service_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slots.bin");

        let mut service = AbSlotService::provision(
            FileStorage::new(&path),
            &ProvisionConfig::default(),
            CurrentSlot::Index(0),
        )
        .unwrap();
        service.set_active_slot(1).unwrap();
        service.flush().unwrap();
        let expected = service.load_boot_data().unwrap();

        let reopened = AbSlotService::open(FileStorage::new(&path), CurrentSlot::Index(1)).unwrap();
        assert_eq!(reopened.load_boot_data().unwrap(), expected);
        assert_eq!(reopened.get_current_slot().unwrap().priority, 15);
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let dir = tempdir().unwrap();
        let res = AbSlotService::open(FileStorage::new(dir.path().join("none.bin")), CurrentSlot::Unknown);
        assert!(matches!(res, Err(SlotError::StorageReadFailure)));
    }

    #[test]
    fn test_payload_is_kernel_block() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("slots.bin"));
        let block = MetadataBlock::new(&ProvisionConfig::default()).unwrap();
        storage.write_metadata_region(&encode(&block)).unwrap();
        let bytes = storage.read_metadata_region().unwrap();
        assert_eq!(decode(&bytes).unwrap(), block);
    }
}
