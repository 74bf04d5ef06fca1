// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Why an encoded metadata block was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("buffer too short: {found} bytes")]
    Truncated { found: usize },
    #[error("bad magic")]
    BadMagic,
    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u8),
    #[error("slot count {0} outside supported range")]
    SlotCount(u8),
    #[error("length mismatch: expected {expected}, found {found}")]
    Length { expected: usize, found: usize },
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    Checksum { stored: u32, computed: u32 },
    #[error("invalid {kind} byte {value}")]
    Field { kind: &'static str, value: u32 },
    #[error("duplicate suffix in slot {0}")]
    DuplicateSuffix(u8),
    #[error("unbootable slot {0} has no recorded reason")]
    MissingReason(u8),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot index {index} out of range (slot count {slot_count})")]
    InvalidIndex { index: u8, slot_count: u8 },

    #[error("no bootable slot")]
    NoBootableSlot,

    #[error("malformed metadata: {0}")]
    MalformedMetadata(MalformedReason),

    #[error("invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: u32 },

    #[error("slot metadata not initialized")]
    NotInitialized,

    #[error("current slot cannot be determined")]
    NoCurrentSlot,

    #[error("storage write failed")]
    StorageWriteFailure,

    #[error("storage read failed")]
    StorageReadFailure,

    #[error("invalid provisioning config: {0}")]
    InvalidConfig(&'static str),
}

impl From<MalformedReason> for SlotError {
    fn from(reason: MalformedReason) -> Self {
        SlotError::MalformedMetadata(reason)
    }
}

pub type SlotResult<T> = core::result::Result<T, SlotError>;
pub type Result<T> = SlotResult<T>;
