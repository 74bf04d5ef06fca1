// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fastboot slot commands.
//!
//! Handles the slot-related subset of the fastboot command set on top of any
//! `AbSlotProtocol`. Commands that change metadata flush before replying
//! `OKAY`, so the host only sees success once the change is durable.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use thiserror::Error;

use crate::error::SlotError;
use crate::protocol::AbSlotProtocol;
use crate::transport::{FastbootTransport, RxMode};
use crate::types::enums::{BootMode, MergeStatus};
use crate::types::id::Suffix;

pub const MAX_COMMAND_LEN: usize = 64;
pub const MAX_RESPONSE_LEN: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Var<'a> {
    CurrentSlot,
    SlotCount,
    SlotSuffixes,
    SlotSuccessful(&'a str),
    SlotUnbootable(&'a str),
    SlotRetryCount(&'a str),
    SnapshotUpdateStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotAction {
    Cancel,
    Merge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    GetVar(Var<'a>),
    SetActive(&'a str),
    Reboot(BootMode),
    SnapshotUpdate(SnapshotAction),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(var) = line.strip_prefix("getvar:") {
            let var = match var {
                "current-slot" => Var::CurrentSlot,
                "slot-count" => Var::SlotCount,
                "slot-suffixes" => Var::SlotSuffixes,
                "snapshot-update-status" => Var::SnapshotUpdateStatus,
                _ => {
                    let (name, slot) = var.split_once(':')?;
                    match name {
                        "slot-successful" => Var::SlotSuccessful(slot),
                        "slot-unbootable" => Var::SlotUnbootable(slot),
                        "slot-retry-count" => Var::SlotRetryCount(slot),
                        _ => return None,
                    }
                }
            };
            return Some(Command::GetVar(var));
        }
        if let Some(slot) = line.strip_prefix("set_active:") {
            return Some(Command::SetActive(slot));
        }
        match line {
            "reboot-recovery" => Some(Command::Reboot(BootMode::Recovery)),
            "reboot-fastboot" => Some(Command::Reboot(BootMode::Fastbootd)),
            "reboot-bootloader" => Some(Command::Reboot(BootMode::Bootloader)),
            "snapshot-update:cancel" => Some(Command::SnapshotUpdate(SnapshotAction::Cancel)),
            "snapshot-update:merge" => Some(Command::SnapshotUpdate(SnapshotAction::Merge)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Okay(String),
    Fail(String),
}

impl Response {
    fn fail(err: SlotError) -> Self {
        Response::Fail(err.to_string())
    }

    /// Wire form: 4-byte status followed by the message, capped at 64 bytes.
    pub fn to_packet(&self) -> Vec<u8> {
        let (status, msg) = match self {
            Response::Okay(m) => ("OKAY", m),
            Response::Fail(m) => ("FAIL", m),
        };
        let mut packet = Vec::with_capacity(MAX_RESPONSE_LEN);
        packet.extend_from_slice(status.as_bytes());
        let room = MAX_RESPONSE_LEN - status.len();
        packet.extend_from_slice(&msg.as_bytes()[..msg.len().min(room)]);
        packet
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FastbootError {
    #[error("transport error: {0}")]
    Transport(String),
}

fn resolve_slot<P: AbSlotProtocol + ?Sized>(slots: &P, arg: &str) -> Result<u8, Response> {
    let name = arg.strip_prefix('_').unwrap_or(arg);
    let mut chars = name.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(Response::Fail(format!("invalid slot '{}'", arg)));
    };
    let block = slots.load_boot_data().map_err(Response::fail)?;
    block
        .index_of(Suffix::from_char(c))
        .ok_or_else(|| Response::Fail(format!("no such slot '{}'", arg)))
}

fn yes_no(v: bool) -> String {
    let s = if v { "yes" } else { "no" };
    s.to_string()
}

fn getvar<P: AbSlotProtocol + ?Sized>(slots: &P, var: Var<'_>) -> Result<String, Response> {
    match var {
        Var::CurrentSlot => {
            let slot = slots.get_current_slot().map_err(Response::fail)?;
            Ok(slot.suffix.to_string())
        }
        Var::SlotCount => {
            let block = slots.load_boot_data().map_err(Response::fail)?;
            Ok(block.slot_count().to_string())
        }
        Var::SlotSuffixes => {
            let block = slots.load_boot_data().map_err(Response::fail)?;
            let names: Vec<String> = block.slots().iter().map(|s| s.suffix.to_string()).collect();
            Ok(names.join(","))
        }
        Var::SlotSuccessful(arg) => {
            let index = resolve_slot(slots, arg)?;
            let slot = slots.get_slot_info(index).map_err(Response::fail)?;
            Ok(yes_no(slot.successful))
        }
        Var::SlotUnbootable(arg) => {
            let index = resolve_slot(slots, arg)?;
            let slot = slots.get_slot_info(index).map_err(Response::fail)?;
            Ok(yes_no(!slot.is_bootable()))
        }
        Var::SlotRetryCount(arg) => {
            let index = resolve_slot(slots, arg)?;
            let slot = slots.get_slot_info(index).map_err(Response::fail)?;
            Ok(slot.tries.to_string())
        }
        Var::SnapshotUpdateStatus => {
            let status = slots.get_merge_status().map_err(Response::fail)?;
            Ok(status.as_str().to_string())
        }
    }
}

fn run<P: AbSlotProtocol + ?Sized>(cmd: Command<'_>, slots: &mut P) -> Result<String, Response> {
    match cmd {
        Command::GetVar(var) => getvar(slots, var),
        Command::SetActive(arg) => {
            let index = resolve_slot(slots, arg)?;
            slots.set_active_slot(index).map_err(Response::fail)?;
            slots.flush().map_err(Response::fail)?;
            Ok(String::new())
        }
        Command::Reboot(mode) => {
            slots.set_boot_mode(mode as u32).map_err(Response::fail)?;
            slots.flush().map_err(Response::fail)?;
            Ok(String::new())
        }
        Command::SnapshotUpdate(action) => {
            let next = match action {
                SnapshotAction::Cancel => MergeStatus::Cancelled,
                SnapshotAction::Merge => match slots.get_merge_status().map_err(Response::fail)? {
                    MergeStatus::Snapshotted | MergeStatus::Merging => MergeStatus::Merging,
                    _ => return Err(Response::Fail("no snapshot to merge".to_string())),
                },
            };
            slots.set_merge_status(next as u8).map_err(Response::fail)?;
            slots.flush().map_err(Response::fail)?;
            Ok(String::new())
        }
    }
}

/// Executes one parsed command line against `slots`.
pub fn execute<P: AbSlotProtocol + ?Sized>(line: &str, slots: &mut P) -> Response {
    let Some(cmd) = Command::parse(line) else {
        tracing::debug!("fastboot: unknown command '{}'", line);
        return Response::Fail("unknown command".to_string());
    };
    match run(cmd, slots) {
        Ok(msg) => Response::Okay(msg),
        Err(resp) => resp,
    }
}

/// One fastboot connection serving slot commands from `slots`.
pub struct FastbootSession<'a, T: FastbootTransport, P: AbSlotProtocol + ?Sized> {
    transport: &'a mut T,
    slots: &'a mut P,
}

fn transport_err<E: core::fmt::Display>(e: E) -> FastbootError {
    FastbootError::Transport(e.to_string())
}

impl<'a, T: FastbootTransport, P: AbSlotProtocol + ?Sized> FastbootSession<'a, T, P> {
    /// Starts the transport.
    pub fn open(transport: &'a mut T, slots: &'a mut P) -> Result<Self, FastbootError> {
        transport.start().map_err(transport_err)?;
        Ok(Self { transport, slots })
    }

    pub fn slots(&self) -> &P {
        &*self.slots
    }

    /// Receives one command packet, executes it and sends the reply.
    pub fn serve_one(&mut self) -> Result<Response, FastbootError> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let n = self
            .transport
            .receive(&mut buf, RxMode::SinglePacket)
            .map_err(transport_err)?;

        let response = match core::str::from_utf8(&buf[..n]) {
            Ok(line) => execute(line.trim_end_matches(['\r', '\n']), self.slots),
            Err(_) => Response::Fail("command is not valid UTF-8".to_string()),
        };

        self.transport.send(&response.to_packet()).map_err(transport_err)?;
        self.transport.flush().map_err(transport_err)?;
        Ok(response)
    }

    pub fn close(self) -> Result<(), FastbootError> {
        self.transport.stop().map_err(transport_err)
    }
}
