// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;
pub mod slot;
pub mod block;

pub use block::MetadataBlock;
pub use enums::{BootMode, MergeStatus, UnbootableReason};
pub use id::Suffix;
pub use slot::SlotRecord;
