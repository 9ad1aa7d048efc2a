//! embassy-net UDP transport for the time-sync client

use core::net::{IpAddr, SocketAddr};

use defmt::{info, warn, Debug2Format};
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{ConfigV4, DhcpConfig, IpAddress, IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io::ErrorKind;
use hal_abstractions::DatagramTransport;

/// Transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum EthError {
    /// No DHCP lease within the configured wait
    DhcpTimeout,
    /// DNS lookup failed or returned no address
    Dns,
    /// Failed to bind socket to local port
    BindFailed,
    /// Failed to send data
    SendFailed,
    /// Failed to receive data
    ReceiveFailed,
    /// No datagram before the deadline
    Timeout,
}

impl core::fmt::Display for EthError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::DhcpTimeout => "no DHCP lease",
            Self::Dns => "DNS lookup failed",
            Self::BindFailed => "UDP bind failed",
            Self::SendFailed => "UDP send failed",
            Self::ReceiveFailed => "UDP receive failed",
            Self::Timeout => "receive timed out",
        })
    }
}

impl core::error::Error for EthError {}

impl embedded_io::Error for EthError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DhcpTimeout => ErrorKind::NotConnected,
            Self::Dns => ErrorKind::NotFound,
            Self::BindFailed => ErrorKind::AddrInUse,
            Self::SendFailed | Self::ReceiveFailed => ErrorKind::Other,
            Self::Timeout => ErrorKind::TimedOut,
        }
    }
}

/// Largest datagram taken off the socket whole; also the rx buffer size
const MAX_DATAGRAM: usize = 256;

/// Static socket storage; one NTP packet in each direction plus slack
pub struct SocketBuffers {
    rx_meta: [PacketMetadata; 2],
    rx: [u8; MAX_DATAGRAM],
    tx_meta: [PacketMetadata; 2],
    tx: [u8; 128],
}

impl SocketBuffers {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; 2],
            rx: [0; MAX_DATAGRAM],
            tx_meta: [PacketMetadata::EMPTY; 2],
            tx: [0; 128],
        }
    }
}

/// [`DatagramTransport`] over an embassy-net stack
///
/// The stack starts with no IPv4 configuration. `connect` requests a DHCP
/// lease, `power_down` drops it.
pub struct EthTransport {
    stack: Stack<'static>,
    socket: UdpSocket<'static>,
    dhcp_timeout: Duration,
    // embassy-net rejects datagrams longer than the caller's buffer
    scratch: [u8; MAX_DATAGRAM],
}

impl EthTransport {
    pub fn new(stack: Stack<'static>, buffers: &'static mut SocketBuffers, dhcp_timeout_ms: u64) -> Self {
        let SocketBuffers {
            rx_meta,
            rx,
            tx_meta,
            tx,
        } = buffers;
        Self {
            stack,
            socket: UdpSocket::new(stack, rx_meta, rx, tx_meta, tx),
            dhcp_timeout: Duration::from_millis(dhcp_timeout_ms),
            scratch: [0; MAX_DATAGRAM],
        }
    }

    fn log_config(&self) {
        if let Some(config) = self.stack.config_v4() {
            let octets = config.address.address().octets();
            info!(
                "IP: {}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            );
        }
    }
}

impl DatagramTransport for EthTransport {
    type Error = EthError;

    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        info!("Waiting for DHCP...");
        self.stack
            .set_config_v4(ConfigV4::Dhcp(DhcpConfig::default()));
        with_timeout(self.dhcp_timeout, self.stack.wait_config_up())
            .await
            .map_err(|_| {
                warn!("No DHCP lease after {} ms", self.dhcp_timeout.as_millis());
                EthError::DhcpTimeout
            })?;
        info!("Network is UP!");
        self.log_config();
        Ok(())
    }

    fn bind(&mut self, local_port: u16) -> Result<(), Self::Error> {
        self.socket.close();
        self.socket.bind(local_port).map_err(|e| {
            warn!("UDP bind to port {} failed: {:?}", local_port, e);
            EthError::BindFailed
        })
    }

    async fn discard_pending(&mut self) {
        let mut dropped = 0u32;
        // An already-expired timer loses to any datagram that is queued
        while let Either::First(Ok(_)) =
            select(self.socket.recv_from(&mut self.scratch), Timer::after_ticks(0)).await
        {
            dropped += 1;
        }
        if dropped > 0 {
            info!("Dropped {} stale datagrams", dropped);
        }
    }

    async fn resolve(&mut self, host: &str) -> Result<IpAddr, Self::Error> {
        let addr = self
            .stack
            .dns_query(host, DnsQueryType::A)
            .await
            .map_err(|e| {
                warn!("DNS query for {} failed: {:?}", host, e);
                EthError::Dns
            })?
            .first()
            .copied()
            .ok_or(EthError::Dns)?;
        info!("Resolved {} to {}", host, Debug2Format(&addr));
        Ok(addr.into())
    }

    async fn send_to(&mut self, data: &[u8], remote: SocketAddr) -> Result<(), Self::Error> {
        let endpoint = IpEndpoint::new(IpAddress::from(remote.ip()), remote.port());
        self.socket.send_to(data, endpoint).await.map_err(|e| {
            warn!("UDP send failed: {:?}", e);
            EthError::SendFailed
        })
    }

    async fn recv(&mut self, buf: &mut [u8], timeout_ms: u64) -> Result<usize, Self::Error> {
        let timeout_future = Timer::after(Duration::from_millis(timeout_ms));
        match select(self.socket.recv_from(&mut self.scratch), timeout_future).await {
            Either::First(Ok((len, meta))) => {
                info!(
                    "Received {} bytes from {}",
                    len,
                    Debug2Format(&meta.endpoint)
                );
                let kept = len.min(buf.len());
                buf[..kept].copy_from_slice(&self.scratch[..kept]);
                Ok(len)
            }
            Either::First(Err(e)) => {
                warn!("UDP receive failed: {:?}", e);
                Err(EthError::ReceiveFailed)
            }
            Either::Second(()) => Err(EthError::Timeout),
        }
    }

    async fn power_down(&mut self) {
        self.socket.close();
        self.stack.set_config_v4(ConfigV4::None);
        info!("Network released");
    }
}
