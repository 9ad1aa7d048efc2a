//! Test doubles for the hardware traits

use core::cell::Cell;
use core::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_io::ErrorKind;
use embedded_storage::{ReadStorage, Storage};
use hal_abstractions::{DatagramTransport, MonotonicMillis, RealTimeClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FakeError(pub ErrorKind);

impl core::fmt::Display for FakeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "fake transport error: {:?}", self.0)
    }
}

impl core::error::Error for FakeError {}

impl embedded_io::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Scripted transport; replies queued with `queue_reply` are delivered only
/// after a request has been sent
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    pub connected: bool,
    pub connect_ok: bool,
    pub resolve_ok: bool,
    pub flood_short: bool,
    pub connect_attempts: u32,
    pub power_downs: u32,
    pub recv_calls: u32,
    pub bound_port: Option<u16>,
    pub resolved: Option<String>,
    pub sent: Vec<(Vec<u8>, SocketAddr)>,
    pending: VecDeque<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
}

impl FakeTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            connect_ok: true,
            resolve_ok: true,
            ..Self::default()
        }
    }

    pub fn disconnected(connect_ok: bool) -> Self {
        Self {
            connected: false,
            connect_ok,
            resolve_ok: true,
            ..Self::default()
        }
    }

    pub fn queue_reply(&mut self, packet: &[u8]) {
        self.replies.push_back(packet.to_vec());
    }

    pub fn queue_stale(&mut self, packet: &[u8]) {
        self.pending.push_back(packet.to_vec());
    }
}

impl DatagramTransport for FakeTransport {
    type Error = FakeError;

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.connect_attempts += 1;
        if self.connect_ok {
            self.connected = true;
            Ok(())
        } else {
            Err(FakeError(ErrorKind::NotConnected))
        }
    }

    fn bind(&mut self, local_port: u16) -> Result<(), Self::Error> {
        self.bound_port = Some(local_port);
        Ok(())
    }

    async fn discard_pending(&mut self) {
        self.pending.clear();
    }

    async fn resolve(&mut self, host: &str) -> Result<IpAddr, Self::Error> {
        self.resolved = Some(host.into());
        if self.resolve_ok {
            Ok(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 123)))
        } else {
            Err(FakeError(ErrorKind::NotFound))
        }
    }

    async fn send_to(&mut self, data: &[u8], remote: SocketAddr) -> Result<(), Self::Error> {
        self.sent.push((data.to_vec(), remote));
        self.pending.extend(self.replies.drain(..));
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8], _timeout_ms: u64) -> Result<usize, Self::Error> {
        self.recv_calls += 1;
        if self.flood_short {
            return Ok(8);
        }
        match self.pending.pop_front() {
            Some(packet) => {
                let len = packet.len().min(buf.len());
                buf[..len].copy_from_slice(&packet[..len]);
                Ok(packet.len())
            }
            None => Err(FakeError(ErrorKind::TimedOut)),
        }
    }

    async fn power_down(&mut self) {
        self.power_downs += 1;
        self.connected = false;
    }
}

/// Monotonic clock advancing by `step` on every reading
pub(crate) struct StepClock {
    now: Cell<u64>,
    step: u64,
}

impl StepClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl MonotonicMillis for StepClock {
    fn now_millis(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeRtc {
    pub unix_secs: u64,
    pub broken: bool,
    pub writes: Vec<(u64, u16)>,
}

impl FakeRtc {
    pub fn at(unix_secs: u64) -> Self {
        Self {
            unix_secs,
            ..Self::default()
        }
    }
}

impl RealTimeClock for FakeRtc {
    type Error = ();

    fn now_unix_secs(&mut self) -> Result<u64, Self::Error> {
        if self.broken {
            Err(())
        } else {
            Ok(self.unix_secs)
        }
    }

    fn set_unix_time(&mut self, unix_secs: u64, millis: u16) -> Result<(), Self::Error> {
        self.writes.push((unix_secs, millis));
        self.unix_secs = unix_secs;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StorageFault;

/// Erased (0xFF) RAM standing in for non-volatile memory
#[derive(Debug, Clone)]
pub(crate) struct RamStorage {
    pub bytes: [u8; 32],
    pub writes: usize,
    pub fail_writes: bool,
}

impl Default for RamStorage {
    fn default() -> Self {
        Self {
            bytes: [0xFF; 32],
            writes: 0,
            fail_writes: false,
        }
    }
}

impl ReadStorage for RamStorage {
    type Error = StorageFault;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let src = self
            .bytes
            .get(start..start + bytes.len())
            .ok_or(StorageFault)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for RamStorage {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(StorageFault);
        }
        let start = offset as usize;
        let dst = self
            .bytes
            .get_mut(start..start + bytes.len())
            .ok_or(StorageFault)?;
        dst.copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
