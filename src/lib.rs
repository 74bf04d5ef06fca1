// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! abslot-kernel: a no_std A/B boot-slot metadata state machine.
//!
//! Tracks per-slot priority, retry budget and success, arbitrates the next
//! boot target, and persists one checksummed metadata block through a
//! storage collaborator.

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod types;
pub mod codec;
pub mod store;
pub mod arbiter;
pub mod tracker;
pub mod durability;
pub mod protocol;
pub mod transport;
pub mod fastboot;

#[cfg(test)]
pub mod tests;

pub use config::ProvisionConfig;
pub use durability::{DurabilityBoundary, FlushOutcome, MemoryStorage, MetadataStorage};
pub use error::{MalformedReason, SlotError, SlotResult};
pub use protocol::{AbSlotProtocol, AbSlotService};
pub use store::{CurrentSlot, SlotStore};
pub use types::{BootMode, MergeStatus, MetadataBlock, SlotRecord, Suffix, UnbootableReason};
