// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::ProvisionConfig;
use crate::durability::MemoryStorage;
use crate::fastboot::{execute, Command, FastbootError, FastbootSession, Response, SnapshotAction, Var};
use crate::protocol::{AbSlotProtocol, AbSlotService};
use crate::store::CurrentSlot;
use crate::transport::{FastbootTransport, LoopbackTransport, RxMode, TransportError};
use crate::types::enums::{BootMode, MergeStatus};
use std::string::{String, ToString};

fn device() -> AbSlotService<MemoryStorage> {
    AbSlotService::provision(MemoryStorage::erased(64), &ProvisionConfig::default(), CurrentSlot::Index(0))
        .unwrap()
}

fn okay(msg: &str) -> Response {
    Response::Okay(msg.to_string())
}

fn fail(msg: &str) -> Response {
    Response::Fail(msg.to_string())
}

#[test]
fn test_parse_commands() {
    assert_eq!(Command::parse("getvar:current-slot"), Some(Command::GetVar(Var::CurrentSlot)));
    assert_eq!(
        Command::parse("getvar:slot-retry-count:_b"),
        Some(Command::GetVar(Var::SlotRetryCount("_b")))
    );
    assert_eq!(Command::parse("set_active:a"), Some(Command::SetActive("a")));
    assert_eq!(Command::parse("reboot-fastboot"), Some(Command::Reboot(BootMode::Fastbootd)));
    assert_eq!(
        Command::parse("snapshot-update:cancel"),
        Some(Command::SnapshotUpdate(SnapshotAction::Cancel))
    );
    assert_eq!(Command::parse("getvar:slot-colour:a"), None);
    assert_eq!(Command::parse("flash:boot"), None);
}

#[test]
fn test_getvar_slot_queries() {
    let mut dev = device();
    assert_eq!(execute("getvar:current-slot", &mut dev), okay("a"));
    assert_eq!(execute("getvar:slot-count", &mut dev), okay("2"));
    assert_eq!(execute("getvar:slot-suffixes", &mut dev), okay("a,b"));
    assert_eq!(execute("getvar:slot-retry-count:b", &mut dev), okay("7"));
    assert_eq!(execute("getvar:slot-successful:_a", &mut dev), okay("no"));
    assert_eq!(execute("getvar:slot-unbootable:a", &mut dev), okay("no"));
    assert_eq!(execute("getvar:snapshot-update-status", &mut dev), okay("none"));
}

#[test]
fn test_getvar_bad_slot() {
    let mut dev = device();
    assert_eq!(execute("getvar:slot-successful:c", &mut dev), fail("no such slot 'c'"));
    assert_eq!(execute("getvar:slot-successful:ab", &mut dev), fail("invalid slot 'ab'"));
    assert_eq!(execute("getvar:slot-successful:", &mut dev), fail("invalid slot ''"));
}

#[test]
fn test_set_active_flushes() {
    let mut dev = device();
    assert_eq!(execute("set_active:_b", &mut dev), okay(""));
    assert_eq!(dev.storage().writes(), 1);
    assert!(!dev.is_dirty());

    assert_eq!(dev.get_slot_info(0).unwrap().priority, 14);
    assert_eq!(dev.get_slot_info(1).unwrap().priority, 15);
    assert_eq!(dev.get_next_slot(false).unwrap().suffix.as_char(), Some('b'));
}

#[test]
fn test_set_active_reports_write_failure() {
    let mut storage = MemoryStorage::erased(64);
    storage.set_fail_writes(true);
    let mut dev =
        AbSlotService::provision(storage, &ProvisionConfig::default(), CurrentSlot::Index(0)).unwrap();
    assert_eq!(execute("set_active:b", &mut dev), fail("storage write failed"));
}

#[test]
fn test_reboot_commands_set_boot_mode() {
    let mut dev = device();
    assert_eq!(execute("reboot-recovery", &mut dev), okay(""));
    assert_eq!(dev.get_boot_mode().unwrap(), BootMode::Recovery);
    assert_eq!(execute("reboot-bootloader", &mut dev), okay(""));
    assert_eq!(dev.get_boot_mode().unwrap(), BootMode::Bootloader);
    assert_eq!(dev.storage().writes(), 2);
}

#[test]
fn test_snapshot_update() {
    let mut dev = device();
    assert_eq!(execute("snapshot-update:merge", &mut dev), fail("no snapshot to merge"));

    dev.set_merge_status(MergeStatus::Snapshotted as u8).unwrap();
    assert_eq!(execute("snapshot-update:merge", &mut dev), okay(""));
    assert_eq!(execute("getvar:snapshot-update-status", &mut dev), okay("merging"));

    assert_eq!(execute("snapshot-update:cancel", &mut dev), okay(""));
    assert_eq!(dev.get_merge_status().unwrap(), MergeStatus::Cancelled);
}

#[test]
fn test_unknown_command() {
    let mut dev = device();
    assert_eq!(execute("erase:userdata", &mut dev), fail("unknown command"));
}

#[test]
fn test_response_packet_is_capped() {
    let long: String = core::iter::repeat('x').take(100).collect();
    let packet = Response::Fail(long).to_packet();
    assert_eq!(packet.len(), 64);
    assert_eq!(&packet[..4], b"FAIL");
    assert_eq!(okay("b").to_packet(), b"OKAYb".to_vec());
}

#[test]
fn test_session_over_loopback() {
    let mut dev = device();
    let mut usb = LoopbackTransport::new();
    usb.push_packet(b"getvar:slot-count");
    usb.push_packet(b"set_active:b\n");

    let mut session = FastbootSession::open(&mut usb, &mut dev).unwrap();
    assert_eq!(session.serve_one().unwrap(), okay("2"));
    assert_eq!(session.serve_one().unwrap(), okay(""));
    assert_eq!(
        session.serve_one(),
        Err(FastbootError::Transport("no data available".to_string()))
    );
    assert_eq!(session.slots().get_slot_info(1).unwrap().priority, 15);
    session.close().unwrap();

    let sent = usb.take_sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], b"OKAY2".to_vec());
    assert_eq!(sent[1], b"OKAY".to_vec());
    assert!(!usb.is_started());
    assert_eq!(dev.storage().writes(), 1);
}

#[test]
fn test_session_rejects_non_utf8() {
    let mut dev = device();
    let mut usb = LoopbackTransport::new();
    usb.push_packet(&[0xFF, 0xFE]);
    let mut session = FastbootSession::open(&mut usb, &mut dev).unwrap();
    assert_eq!(session.serve_one().unwrap(), fail("command is not valid UTF-8"));
}

#[test]
fn test_loopback_fixed_length_spans_packets() {
    let mut usb = LoopbackTransport::new();
    usb.start().unwrap();
    usb.push_packet(b"abc");
    usb.push_packet(b"defg");

    let mut buf = [0u8; 5];
    assert_eq!(usb.receive(&mut buf, RxMode::FixedLength).unwrap(), 5);
    assert_eq!(&buf, b"abcde");

    let mut rest = [0u8; 4];
    assert_eq!(
        usb.receive(&mut rest, RxMode::FixedLength),
        Err(TransportError::Incomplete { wanted: 4, available: 2 })
    );
    assert_eq!(usb.receive(&mut rest, RxMode::SinglePacket).unwrap(), 2);
    assert_eq!(&rest[..2], b"fg");
}

#[test]
fn test_loopback_stop_drops_unflushed() {
    let mut usb = LoopbackTransport::new();
    usb.start().unwrap();
    usb.send(b"OKAY").unwrap();
    usb.stop().unwrap();
    assert!(usb.sent().is_empty());
    assert!(!usb.is_started());
}
