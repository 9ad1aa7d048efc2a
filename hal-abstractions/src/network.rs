//! Connectionless transport abstraction
//!
//! Mirrors the small subset of a radio/Ethernet UDP stack the time-sync
//! client needs. Errors implement [`embedded_io::Error`] so callers can tell
//! a receive timeout (`ErrorKind::TimedOut`) apart from a broken link.

use core::future::Future;
use core::net::{IpAddr, SocketAddr};

/// Datagram transport with a bounded receive
///
/// Implementors handle their own hardware quirks and report failures via
/// `Self::Error` rather than panicking.
pub trait DatagramTransport {
    /// Transport error type
    type Error: embedded_io::Error;

    /// Whether the link is up and has an address
    fn is_connected(&self) -> bool;

    /// Make one attempt at bringing the link up
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Bind the local port that receives replies
    fn bind(&mut self, local_port: u16) -> Result<(), Self::Error>;

    /// Drop every datagram already queued on the bound port
    fn discard_pending(&mut self) -> impl Future<Output = ()>;

    /// Resolve a host name to an address
    fn resolve(&mut self, host: &str) -> impl Future<Output = Result<IpAddr, Self::Error>>;

    /// Send one datagram
    fn send_to(
        &mut self,
        data: &[u8],
        remote: SocketAddr,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Receive one datagram, waiting at most `timeout_ms`
    ///
    /// Returns the datagram length. Excess bytes beyond `buf` are dropped.
    /// Expiry is reported as an error whose kind is `ErrorKind::TimedOut`.
    fn recv(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u64,
    ) -> impl Future<Output = Result<usize, Self::Error>>;

    /// Release the link and power the radio down
    fn power_down(&mut self) -> impl Future<Output = ()>;
}
