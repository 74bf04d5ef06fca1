// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Metadata block decoding.

use byteorder::{ByteOrder, LittleEndian};

use crate::codec::encode::{encoded_len, CRC_LEN, FLAG_TRACKS_REASONS, HEADER_LEN, RECORD_LEN};
use crate::config::{MAGIC, MAX_PRIORITY, MAX_SLOTS, SCHEMA_VERSION};
use crate::error::{MalformedReason, Result};
use crate::types::block::MetadataBlock;
use crate::types::enums::{BootMode, MergeStatus, UnbootableReason};
use crate::types::id::Suffix;
use crate::types::slot::SlotRecord;

fn read_u8(buf: &[u8], offset: &mut usize) -> core::result::Result<u8, MalformedReason> {
    let val = *buf
        .get(*offset)
        .ok_or(MalformedReason::Truncated { found: buf.len() })?;
    *offset += 1;
    Ok(val)
}

fn read_u32(buf: &[u8], offset: &mut usize) -> core::result::Result<u32, MalformedReason> {
    if *offset + 4 > buf.len() {
        return Err(MalformedReason::Truncated { found: buf.len() });
    }
    let val = LittleEndian::read_u32(&buf[*offset..*offset + 4]);
    *offset += 4;
    Ok(val)
}

fn read_bool(buf: &[u8], offset: &mut usize) -> core::result::Result<bool, MalformedReason> {
    match read_u8(buf, offset)? {
        0 => Ok(false),
        1 => Ok(true),
        v => Err(MalformedReason::Field { kind: "successful", value: v as u32 }),
    }
}

// Reserved bytes are written as zero and must read back as zero, so every
// accepted region re-encodes to the same bytes.
fn reserved(bytes: &[u8]) -> core::result::Result<(), MalformedReason> {
    match bytes.iter().find(|b| **b != 0) {
        Some(b) => Err(MalformedReason::Field { kind: "reserved", value: *b as u32 }),
        None => Ok(()),
    }
}

pub fn decode(buf: &[u8]) -> Result<MetadataBlock> {
    if buf.len() < HEADER_LEN + CRC_LEN {
        return Err(MalformedReason::Truncated { found: buf.len() }.into());
    }

    // Header
    if &buf[0..4] != MAGIC {
        return Err(MalformedReason::BadMagic.into());
    }
    if buf[4] != SCHEMA_VERSION {
        return Err(MalformedReason::UnsupportedVersion(buf[4]).into());
    }
    let slot_count = buf[5];
    if slot_count == 0 || slot_count as usize > MAX_SLOTS {
        return Err(MalformedReason::SlotCount(slot_count).into());
    }
    let expected = encoded_len(slot_count);
    if buf.len() != expected {
        return Err(MalformedReason::Length { expected, found: buf.len() }.into());
    }

    let body_len = expected - CRC_LEN;
    let stored = LittleEndian::read_u32(&buf[body_len..]);
    let computed = crc32fast::hash(&buf[..body_len]);
    if stored != computed {
        return Err(MalformedReason::Checksum { stored, computed }.into());
    }

    let max_retries = buf[6];
    let flags = buf[7];
    if flags & !FLAG_TRACKS_REASONS != 0 {
        return Err(MalformedReason::Field { kind: "flags", value: flags as u32 }.into());
    }
    let merge_status = MergeStatus::from_u8(buf[8])
        .ok_or(MalformedReason::Field { kind: "merge status", value: buf[8] as u32 })?;
    let boot_mode = BootMode::from_u32(buf[9] as u32)
        .ok_or(MalformedReason::Field { kind: "boot mode", value: buf[9] as u32 })?;
    reserved(&buf[10..HEADER_LEN])?;

    let mut block = MetadataBlock {
        slot_count,
        max_retries,
        tracks_unbootable_reasons: flags & FLAG_TRACKS_REASONS != 0,
        merge_status,
        boot_mode,
        slots: [SlotRecord::EMPTY; MAX_SLOTS],
    };

    // Records
    let mut offset = HEADER_LEN;
    for i in 0..slot_count as usize {
        let suffix = Suffix(read_u32(buf, &mut offset)?);
        let reason_raw = read_u32(buf, &mut offset)?;
        let unbootable_reason = UnbootableReason::from_u32(reason_raw)
            .ok_or(MalformedReason::Field { kind: "unbootable reason", value: reason_raw })?;
        let priority = read_u8(buf, &mut offset)?;
        if priority > MAX_PRIORITY {
            return Err(MalformedReason::Field { kind: "priority", value: priority as u32 }.into());
        }
        let tries = read_u8(buf, &mut offset)?;
        let successful = read_bool(buf, &mut offset)?;
        reserved(&[read_u8(buf, &mut offset)?])?;

        block.slots[i] = SlotRecord {
            suffix,
            priority,
            tries,
            successful,
            unbootable_reason,
        };
    }
    debug_assert_eq!(offset, HEADER_LEN + RECORD_LEN * slot_count as usize);

    block.check_invariants()?;
    Ok(block)
}
