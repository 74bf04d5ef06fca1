// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! File envelope around the encoded metadata block.
//!
//! `[magic "ABFS"][payload_len u32][crc64 u64][payload]`, little endian.
//! The kernel block carries its own CRC-32; the envelope lets the file layer
//! tell a torn or truncated file from a valid one before handing bytes up.

use crate::error::{PersistenceError, Result};
use byteorder::{ByteOrder, LittleEndian};
use crc64fast::Digest;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub magic: [u8; 4],
    pub payload_len: u32,
    pub checksum: u64,
}

impl EnvelopeHeader {
    pub const SIZE: usize = 4 + 4 + 8; // 16 bytes
    pub const MAGIC: [u8; 4] = *b"ABFS";

    pub fn for_payload(payload: &[u8]) -> Self {
        Self {
            magic: Self::MAGIC,
            payload_len: payload.len() as u32,
            checksum: checksum(payload),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        LittleEndian::write_u32(&mut buf[4..8], self.payload_len);
        LittleEndian::write_u64(&mut buf[8..16], self.checksum);
        buf
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        if magic != Self::MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }

        Ok(Self {
            magic,
            payload_len: LittleEndian::read_u32(&buf[4..8]),
            checksum: LittleEndian::read_u64(&buf[8..16]),
        })
    }
}

fn checksum(payload: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(payload);
    digest.sum64()
}

pub fn seal(payload: &[u8]) -> Vec<u8> {
    let header = EnvelopeHeader::for_payload(payload);
    let mut out = Vec::with_capacity(EnvelopeHeader::SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// Verifies the envelope and returns the payload.
pub fn open<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let header = EnvelopeHeader::read_from(&mut reader)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    if payload.len() != header.payload_len as usize {
        return Err(PersistenceError::InvalidFormat(format!(
            "payload is {} bytes, header says {}",
            payload.len(),
            header.payload_len
        )));
    }

    let found = checksum(&payload);
    if found != header.checksum {
        return Err(PersistenceError::ChecksumMismatch {
            expected: header.checksum,
            found,
        });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open() {
        let sealed = seal(b"slot metadata");
        assert_eq!(sealed.len(), EnvelopeHeader::SIZE + 13);
        assert_eq!(&sealed[0..4], b"ABFS");
        assert_eq!(open(&sealed[..]).unwrap(), b"slot metadata".to_vec());
    }

    #[test]
    fn test_invalid_magic() {
        let mut sealed = seal(b"x");
        sealed[0] = b'Z';
        assert!(matches!(open(&sealed[..]), Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_truncated_payload() {
        let sealed = seal(b"abcdef");
        let res = open(&sealed[..sealed.len() - 2]);
        assert!(matches!(res, Err(PersistenceError::InvalidFormat(_))));
    }

    #[test]
    fn test_corrupted_payload() {
        let mut sealed = seal(b"abcdef");
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(matches!(
            open(&sealed[..]),
            Err(PersistenceError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_short_header() {
        let res = open(&b"ABF"[..]);
        assert!(matches!(res, Err(PersistenceError::IoError(_))));
    }
}
