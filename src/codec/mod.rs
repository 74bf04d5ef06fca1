// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod encode;
pub mod decode;
pub mod digest;

pub use decode::decode;
pub use digest::{metadata_digest, region_digest, Digest};
pub use encode::{encode, encoded_len};
