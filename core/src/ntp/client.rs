//! NTP client over a [`DatagramTransport`]

use core::net::SocketAddr;

use embedded_io::{Error as _, ErrorKind};
use hal_abstractions::{DatagramTransport, MonotonicMillis};

use super::config::NtpConfig;
use super::error::SyncError;
use super::packet::{build_request, ServerTime, NTP_PACKET_SIZE};
use crate::time::Timestamp;

/// Single-attempt NTP client
///
/// Each call performs exactly one exchange and always powers the transport
/// down afterwards, whatever the outcome.
#[derive(Debug, Clone, Default)]
pub struct TimeSyncClient {
    config: NtpConfig,
}

impl TimeSyncClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: NtpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NtpConfig {
        &self.config
    }

    /// Fetch UTC time using the configured receive window
    pub async fn fetch_time<T, M>(&self, transport: &mut T, mono: &M) -> Result<Timestamp, SyncError>
    where
        T: DatagramTransport,
        M: MonotonicMillis,
    {
        self.fetch_time_within(transport, mono, self.config.timeout_ms)
            .await
    }

    /// Fetch UTC time, waiting at most `timeout_ms` for the reply
    pub async fn fetch_time_within<T, M>(
        &self,
        transport: &mut T,
        mono: &M,
        timeout_ms: u64,
    ) -> Result<Timestamp, SyncError>
    where
        T: DatagramTransport,
        M: MonotonicMillis,
    {
        info!("Starting NTP synchronisation via {}", self.config.server);
        let result = self.exchange(transport, mono, timeout_ms).await;
        transport.power_down().await;
        match &result {
            Ok(ts) => info!("NTP sync successful: {}.{} UTC", ts.unix_secs, ts.millis),
            Err(e) => warn!("NTP sync failed: {:?}", e),
        }
        result
    }

    async fn exchange<T, M>(
        &self,
        transport: &mut T,
        mono: &M,
        timeout_ms: u64,
    ) -> Result<Timestamp, SyncError>
    where
        T: DatagramTransport,
        M: MonotonicMillis,
    {
        if !transport.is_connected() {
            info!("Link down, attempting to connect");
            transport.connect().await.map_err(|_| {
                warn!("Link connection failed");
                SyncError::NetworkUnavailable
            })?;
        }

        transport.bind(self.config.local_port).map_err(|_| {
            warn!("Bind to port {} failed", self.config.local_port);
            SyncError::NetworkUnavailable
        })?;
        // A reply to an earlier request would carry a stale time
        transport.discard_pending().await;

        let server_ip = transport.resolve(self.config.server).await.map_err(|_| {
            warn!("Failed to resolve {}", self.config.server);
            SyncError::NetworkUnavailable
        })?;
        let server = SocketAddr::new(server_ip, self.config.server_port);

        transport
            .send_to(&build_request(), server)
            .await
            .map_err(|_| {
                warn!("Failed to send NTP request");
                SyncError::NetworkUnavailable
            })?;
        debug!("Sent NTP request, waiting up to {} ms", timeout_ms);

        let mut packet = [0u8; NTP_PACKET_SIZE];
        let started = mono.now_millis();
        let mut discarded = false;
        loop {
            let elapsed = mono.now_millis().saturating_sub(started);
            if elapsed >= timeout_ms {
                break;
            }
            match transport.recv(&mut packet, timeout_ms - elapsed).await {
                Ok(len) => match ServerTime::parse(&packet[..len.min(NTP_PACKET_SIZE)]) {
                    Some(time) => return Ok(time.timestamp()),
                    None => {
                        warn!("Discarding invalid {} byte reply", len);
                        discarded = true;
                    }
                },
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(_) => {
                    warn!("Receive failed");
                    return Err(SyncError::NetworkUnavailable);
                }
            }
        }

        if discarded {
            Err(SyncError::MalformedResponse)
        } else {
            Err(SyncError::SyncTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ntp::packet::response_with;
    use crate::testing::{FakeError, FakeTransport, StepClock};
    use embassy_futures::block_on;

    #[test]
    fn test_fetch_returns_server_time() {
        let mut transport = FakeTransport::connected();
        transport.queue_reply(&response_with(3_913_056_000, 0x4000));
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Ok(Timestamp::new(1_704_067_200, 250)));
        assert_eq!(transport.bound_port, Some(8888));
        assert_eq!(transport.sent.len(), 1);
        let (request, remote) = &transport.sent[0];
        assert_eq!(request[0], 0xE3);
        assert_eq!(remote.port(), 123);
        assert_eq!(transport.resolved.as_deref(), Some("pool.ntp.org"));
        assert_eq!(transport.power_downs, 1);
    }

    #[test]
    fn test_stale_packets_are_discarded_before_sending() {
        let mut transport = FakeTransport::connected();
        transport.queue_stale(&response_with(3_000_000_000, 0));
        transport.queue_reply(&response_with(3_913_056_000, 0));
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts.map(|t| t.unix_secs), Ok(1_704_067_200));
    }

    #[test]
    fn test_short_packets_are_skipped() {
        let mut transport = FakeTransport::connected();
        transport.queue_reply(&[0x24; 20]);
        transport.queue_reply(&response_with(3_913_056_000, 0));
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts.map(|t| t.unix_secs), Ok(1_704_067_200));
    }

    #[test]
    fn test_reply_with_trailing_extension_is_accepted() {
        // 48-byte header followed by a 4-byte key id and 16-byte digest
        let mut long = [0u8; 68];
        long[..NTP_PACKET_SIZE].copy_from_slice(&response_with(3_913_056_000, 0x8000));
        long[NTP_PACKET_SIZE..].fill(0xA5);
        let mut transport = FakeTransport::connected();
        transport.queue_reply(&long);
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Ok(Timestamp::new(1_704_067_200, 500)));
    }

    #[test]
    fn test_only_short_replies_is_malformed() {
        let mut transport = FakeTransport::connected();
        transport.queue_reply(&[0x24; 47]);
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Err(SyncError::MalformedResponse));
        assert_eq!(transport.power_downs, 1);
    }

    #[test]
    fn test_no_reply_times_out() {
        let mut transport = FakeTransport::connected();
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Err(SyncError::SyncTimeout));
        assert_eq!(transport.power_downs, 1);
    }

    #[test]
    fn test_deadline_bounds_a_flood_of_bad_packets() {
        let mut transport = FakeTransport::connected();
        transport.flood_short = true;
        let mono = StepClock::new(100);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Err(SyncError::MalformedResponse));
        assert!(transport.recv_calls <= 16, "{} receives", transport.recv_calls);
    }

    #[test]
    fn test_single_connect_attempt_then_power_down() {
        let mut transport = FakeTransport::disconnected(false);
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Err(SyncError::NetworkUnavailable));
        assert_eq!(transport.connect_attempts, 1);
        assert!(transport.sent.is_empty());
        assert_eq!(transport.power_downs, 1);
    }

    #[test]
    fn test_connects_when_link_is_down() {
        let mut transport = FakeTransport::disconnected(true);
        transport.queue_reply(&response_with(3_913_056_000, 0));
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert!(ts.is_ok());
        assert_eq!(transport.connect_attempts, 1);
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_resolve_failure_is_network_unavailable() {
        let mut transport = FakeTransport::connected();
        transport.resolve_ok = false;
        let mono = StepClock::new(10);

        let ts = block_on(TimeSyncClient::new().fetch_time(&mut transport, &mono));

        assert_eq!(ts, Err(SyncError::NetworkUnavailable));
        assert_eq!(transport.power_downs, 1);
    }

    #[test]
    fn test_custom_config() {
        let config = NtpConfig {
            server: "time.example.net",
            local_port: 9123,
            ..NtpConfig::default()
        };
        let mut transport = FakeTransport::connected();
        transport.queue_reply(&response_with(3_913_056_000, 0));
        let mono = StepClock::new(10);

        let client = TimeSyncClient::with_config(config);
        assert!(block_on(client.fetch_time_within(&mut transport, &mono, 200)).is_ok());
        assert_eq!(transport.bound_port, Some(9123));
        assert_eq!(transport.resolved.as_deref(), Some("time.example.net"));
    }

    #[test]
    fn test_transport_error_is_a_core_error() {
        use std::string::ToString;

        let err = FakeError(ErrorKind::TimedOut);
        let dynamic: &dyn core::error::Error = &err;
        assert!(dynamic.to_string().contains("TimedOut"));
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }
}
