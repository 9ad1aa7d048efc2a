//! Time-sync client configuration

/// NTP client configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpConfig {
    /// Server pool host name
    pub server: &'static str,
    /// Server UDP port
    pub server_port: u16,
    /// Local UDP port replies arrive on
    pub local_port: u16,
    /// Receive window in milliseconds
    pub timeout_ms: u64,
}

impl Default for NtpConfig {
    fn default() -> Self {
        Self {
            server: "pool.ntp.org",
            server_port: 123,
            local_port: 8888,
            timeout_ms: 1500,
        }
    }
}
