// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Durability boundary.
//!
//! Nothing reaches persistent storage until `flush`. The storage collaborator
//! provides the atomic write; this module only decides what to write and
//! whether a write is needed at all.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use thiserror::Error;

use crate::codec::{self, Digest};
use crate::error::{Result, SlotError};
use crate::types::block::MetadataBlock;

/// Storage collaborator for the fixed-size metadata region.
///
/// `write_metadata_region` must be all-or-nothing: after a failed write the
/// region still holds its previous contents.
pub trait MetadataStorage {
    type Error: fmt::Display;

    fn read_metadata_region(&mut self) -> core::result::Result<Vec<u8>, Self::Error>;

    fn write_metadata_region(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    Written,
    Unchanged,
}

/// Tracks what storage is known to hold, so unchanged state is never rewritten.
#[derive(Debug, Default)]
pub struct DurabilityBoundary {
    persisted: Option<Digest>,
}

impl DurabilityBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and decodes the stored block. The decoded block is remembered as
    /// persisted only when it decodes cleanly.
    pub fn load<S: MetadataStorage>(&mut self, storage: &mut S) -> Result<MetadataBlock> {
        let bytes = storage.read_metadata_region().map_err(|e| {
            tracing::warn!("metadata read failed: {}", e);
            SlotError::StorageReadFailure
        })?;
        let block = codec::decode(&bytes)?;
        // Compare against the canonical encoding, the same form `flush` digests.
        self.persisted = Some(codec::metadata_digest(&block));
        Ok(block)
    }

    pub fn is_persisted(&self, block: &MetadataBlock) -> bool {
        self.persisted == Some(codec::metadata_digest(block))
    }

    pub fn flush<S: MetadataStorage>(&mut self, block: &MetadataBlock, storage: &mut S) -> Result<FlushOutcome> {
        let bytes = codec::encode(block);
        let digest = codec::region_digest(&bytes);
        if self.persisted == Some(digest) {
            tracing::debug!("flush skipped, metadata unchanged");
            return Ok(FlushOutcome::Unchanged);
        }

        storage.write_metadata_region(&bytes).map_err(|e| {
            tracing::warn!("metadata write failed: {}", e);
            SlotError::StorageWriteFailure
        })?;
        self.persisted = Some(digest);
        tracing::info!("metadata flushed ({} bytes)", bytes.len());
        Ok(FlushOutcome::Written)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStorageError {
    #[error("injected write fault")]
    WriteFault,
    #[error("region of {capacity} bytes cannot hold {len} bytes")]
    Oversized { capacity: usize, len: usize },
}

/// RAM-backed stand-in for a flash metadata region. Starts erased (0xFF).
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    region: Vec<u8>,
    capacity: usize,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn erased(capacity: usize) -> Self {
        Self {
            region: vec![0xFF; capacity],
            capacity,
            writes: 0,
            fail_writes: false,
        }
    }

    pub fn with_contents(bytes: &[u8]) -> Self {
        Self {
            region: bytes.to_vec(),
            capacity: bytes.len(),
            writes: 0,
            fail_writes: false,
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.region
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl MetadataStorage for MemoryStorage {
    type Error = MemoryStorageError;

    fn read_metadata_region(&mut self) -> core::result::Result<Vec<u8>, Self::Error> {
        Ok(self.region.clone())
    }

    fn write_metadata_region(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MemoryStorageError::WriteFault);
        }
        if bytes.len() > self.capacity {
            return Err(MemoryStorageError::Oversized {
                capacity: self.capacity,
                len: bytes.len(),
            });
        }
        self.region = bytes.to_vec();
        self.writes += 1;
        Ok(())
    }
}
