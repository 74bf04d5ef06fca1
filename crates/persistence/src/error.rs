// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use abslot_kernel::SlotError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in envelope")]
    InvalidMagic,
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: u64, found: u64 },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
    #[error("Slot metadata error: {0}")]
    Slot(#[from] SlotError),
}

impl PersistenceError {
    /// True when the file (and its backup) simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::IoError(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
