// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Host file backend for the slot metadata region.

pub mod error;
pub mod envelope;
pub mod file;
pub mod fixtures;

pub use error::{PersistenceError, Result};
pub use file::FileStorage;
