// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fastboot transport collaborator.
//!
//! The physical channel (USB, TCP, UART) lives outside this crate. The
//! command path only needs start/stop, packet receive, send and flush.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RxMode {
    /// Return the next packet, truncated to the buffer.
    SinglePacket = 0,
    /// Fill the buffer exactly, spanning packets as needed.
    FixedLength = 1,
}

pub trait FastbootTransport {
    type Error: fmt::Display;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Receives into `buf` and returns the byte count.
    fn receive(&mut self, buf: &mut [u8], mode: RxMode) -> Result<usize, Self::Error>;

    /// Queues `data` for sending and returns the byte count accepted.
    fn send(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Pushes out everything queued by `send`.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport not started")]
    NotStarted,
    #[error("no data available")]
    NoData,
    #[error("fixed-length receive wanted {wanted} bytes, {available} available")]
    Incomplete { wanted: usize, available: usize },
}

/// In-memory transport: the host side pushes packets in and reads flushed
/// packets out.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    started: bool,
    inbound: VecDeque<Vec<u8>>,
    pending: Vec<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_packet(&mut self, packet: &[u8]) {
        self.inbound.push_back(packet.to_vec());
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Packets that have been flushed to the host.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.sent)
    }
}

impl FastbootTransport for LoopbackTransport {
    type Error = TransportError;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.started = false;
        self.pending.clear();
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], mode: RxMode) -> Result<usize, Self::Error> {
        if !self.started {
            return Err(TransportError::NotStarted);
        }
        match mode {
            RxMode::SinglePacket => {
                let packet = self.inbound.pop_front().ok_or(TransportError::NoData)?;
                let n = packet.len().min(buf.len());
                buf[..n].copy_from_slice(&packet[..n]);
                Ok(n)
            }
            RxMode::FixedLength => {
                let available: usize = self.inbound.iter().map(|p| p.len()).sum();
                if available < buf.len() {
                    return Err(TransportError::Incomplete {
                        wanted: buf.len(),
                        available,
                    });
                }
                let mut filled = 0;
                while filled < buf.len() {
                    let Some(mut packet) = self.inbound.pop_front() else { break };
                    let n = packet.len().min(buf.len() - filled);
                    buf[filled..filled + n].copy_from_slice(&packet[..n]);
                    filled += n;
                    if n < packet.len() {
                        packet.drain(..n);
                        self.inbound.push_front(packet);
                    }
                }
                Ok(filled)
            }
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if !self.started {
            return Err(TransportError::NotStarted);
        }
        self.pending.push(data.to_vec());
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if !self.started {
            return Err(TransportError::NotStarted);
        }
        self.sent.append(&mut self.pending);
        Ok(())
    }
}
