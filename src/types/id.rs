// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::config::FIRST_SUFFIX;

/// Unicode code point naming a slot ('a' = 97).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Suffix(pub u32);

impl Suffix {
    /// Suffix assigned to slot `index` at provisioning.
    pub fn for_index(index: u8) -> Self {
        Suffix(FIRST_SUFFIX as u32 + index as u32)
    }

    pub fn from_char(c: char) -> Self {
        Suffix(c as u32)
    }

    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.0)
    }

    /// Only letters and digits are accepted as slot names.
    pub fn is_valid(&self) -> bool {
        self.as_char().is_some_and(|c| c.is_alphanumeric())
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "U+{:04X}", self.0),
        }
    }
}
