// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Slot metadata enums.
//!
//! Discriminants are the wire values used by the firmware protocol and the
//! on-disk block. Raw values coming across the protocol boundary go through
//! `TryFrom`, which fails with `InvalidEnumValue`.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::SlotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum UnbootableReason {
    Unknown = 0,
    NoMoreTries = 1,
    SystemUpdate = 2,
    UserRequested = 3,
    VerificationFailure = 4,
}

impl UnbootableReason {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(UnbootableReason::Unknown),
            1 => Some(UnbootableReason::NoMoreTries),
            2 => Some(UnbootableReason::SystemUpdate),
            3 => Some(UnbootableReason::UserRequested),
            4 => Some(UnbootableReason::VerificationFailure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnbootableReason::Unknown => "unknown",
            UnbootableReason::NoMoreTries => "no-more-tries",
            UnbootableReason::SystemUpdate => "system-update",
            UnbootableReason::UserRequested => "user-requested",
            UnbootableReason::VerificationFailure => "verification-failure",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unknown" => Some(UnbootableReason::Unknown),
            "no-more-tries" => Some(UnbootableReason::NoMoreTries),
            "system-update" => Some(UnbootableReason::SystemUpdate),
            "user-requested" => Some(UnbootableReason::UserRequested),
            "verification-failure" => Some(UnbootableReason::VerificationFailure),
            _ => None,
        }
    }
}

impl Default for UnbootableReason {
    fn default() -> Self {
        UnbootableReason::Unknown
    }
}

impl TryFrom<u32> for UnbootableReason {
    type Error = SlotError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(SlotError::InvalidEnumValue {
            kind: "unbootable reason",
            value,
        })
    }
}

impl fmt::Display for UnbootableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Virtual A/B snapshot-merge state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MergeStatus {
    None = 0,
    Unknown = 1,
    Snapshotted = 2,
    Merging = 3,
    Cancelled = 4,
}

impl MergeStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(MergeStatus::None),
            1 => Some(MergeStatus::Unknown),
            2 => Some(MergeStatus::Snapshotted),
            3 => Some(MergeStatus::Merging),
            4 => Some(MergeStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStatus::None => "none",
            MergeStatus::Unknown => "unknown",
            MergeStatus::Snapshotted => "snapshotted",
            MergeStatus::Merging => "merging",
            MergeStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(MergeStatus::None),
            "unknown" => Some(MergeStatus::Unknown),
            "snapshotted" => Some(MergeStatus::Snapshotted),
            "merging" => Some(MergeStatus::Merging),
            "cancelled" => Some(MergeStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for MergeStatus {
    fn default() -> Self {
        MergeStatus::None
    }
}

impl TryFrom<u8> for MergeStatus {
    type Error = SlotError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(SlotError::InvalidEnumValue {
            kind: "merge status",
            value: value as u32,
        })
    }
}

impl fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Android boot-mode codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum BootMode {
    Normal = 0,
    Recovery = 1,
    Fastbootd = 2,
    Bootloader = 3,
}

impl BootMode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(BootMode::Normal),
            1 => Some(BootMode::Recovery),
            2 => Some(BootMode::Fastbootd),
            3 => Some(BootMode::Bootloader),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BootMode::Normal => "normal",
            BootMode::Recovery => "recovery",
            BootMode::Fastbootd => "fastbootd",
            BootMode::Bootloader => "bootloader",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(BootMode::Normal),
            "recovery" => Some(BootMode::Recovery),
            "fastbootd" => Some(BootMode::Fastbootd),
            "bootloader" => Some(BootMode::Bootloader),
            _ => None,
        }
    }
}

impl Default for BootMode {
    fn default() -> Self {
        BootMode::Normal
    }
}

impl TryFrom<u32> for BootMode {
    type Error = SlotError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(SlotError::InvalidEnumValue {
            kind: "boot mode",
            value,
        })
    }
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
