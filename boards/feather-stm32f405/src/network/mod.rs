//! Network side of the wake cycle
//!
//! The link is idle between syncs: no IPv4 configuration, no bound socket.
//! [`EthTransport`] brings DHCP up on demand for a single NTP exchange and
//! drops the lease again afterwards.

mod config;
mod transport;

pub use config::EthConfig;
pub use transport::{EthError, EthTransport, SocketBuffers};
