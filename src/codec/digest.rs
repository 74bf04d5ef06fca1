// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! BLAKE3 digests of encoded metadata.
//!
//! The durability boundary compares these to tell whether the working copy
//! differs from what storage already holds.

use crate::codec::encode::encode;
use crate::types::block::MetadataBlock;

pub type Digest = [u8; 32];

pub fn region_digest(bytes: &[u8]) -> Digest {
    blake3::hash(bytes).into()
}

pub fn metadata_digest(block: &MetadataBlock) -> Digest {
    region_digest(&encode(block))
}
