// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Metadata block encoding.
//!
//! Layout (all integers little endian):
//! ```text
//! [0..4]   magic "ABSM"
//! [4]      schema version
//! [5]      slot count
//! [6]      max retries
//! [7]      flags (bit 0: unbootable reasons tracked)
//! [8]      merge status
//! [9]      boot mode
//! [10..12] reserved
//! per slot, 12 bytes:
//!   [0..4]  suffix code point
//!   [4..8]  unbootable reason
//!   [8]     priority
//!   [9]     tries
//!   [10]    successful (0/1)
//!   [11]    reserved
//! [..+4]   CRC-32 of everything before it
//! ```

use alloc::vec;
use alloc::vec::Vec;
use byteorder::{ByteOrder, LittleEndian};

use crate::config::{MAGIC, SCHEMA_VERSION};
use crate::types::block::MetadataBlock;

pub const HEADER_LEN: usize = 12;
pub const RECORD_LEN: usize = 12;
pub const CRC_LEN: usize = 4;

pub const FLAG_TRACKS_REASONS: u8 = 0x01;

/// Exact encoded size for a block with `slot_count` slots.
pub const fn encoded_len(slot_count: u8) -> usize {
    HEADER_LEN + RECORD_LEN * slot_count as usize + CRC_LEN
}

pub fn encode(block: &MetadataBlock) -> Vec<u8> {
    let mut buf = vec![0u8; encoded_len(block.slot_count)];

    // Header
    buf[0..4].copy_from_slice(MAGIC);
    buf[4] = SCHEMA_VERSION;
    buf[5] = block.slot_count;
    buf[6] = block.max_retries;
    buf[7] = if block.tracks_unbootable_reasons { FLAG_TRACKS_REASONS } else { 0 };
    buf[8] = block.merge_status as u8;
    buf[9] = block.boot_mode as u8;

    // Records
    for (i, slot) in block.slots().iter().enumerate() {
        let rec = &mut buf[HEADER_LEN + i * RECORD_LEN..HEADER_LEN + (i + 1) * RECORD_LEN];
        LittleEndian::write_u32(&mut rec[0..4], slot.suffix.0);
        LittleEndian::write_u32(&mut rec[4..8], slot.unbootable_reason as u32);
        rec[8] = slot.priority;
        rec[9] = slot.tries;
        rec[10] = slot.successful as u8;
    }

    // Trailer
    let body_len = buf.len() - CRC_LEN;
    let crc = crc32fast::hash(&buf[..body_len]);
    LittleEndian::write_u32(&mut buf[body_len..], crc);

    buf
}
