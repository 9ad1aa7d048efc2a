//! Ethernet link configuration

/// W5500 link and DHCP settings
#[derive(Debug, Clone)]
pub struct EthConfig {
    /// MAC address for Ethernet
    pub mac_addr: [u8; 6],
    /// Random seed for network stack
    pub seed: u64,
    /// Longest wait for a DHCP lease before a sync attempt gives up
    pub dhcp_timeout_ms: u64,
    /// SPI clock for the W5500
    pub spi_hz: u32,
}

impl Default for EthConfig {
    fn default() -> Self {
        Self {
            mac_addr: [0x02, 0x00, 0x00, 0x12, 0x34, 0x56],
            seed: 0x1234_5678_u64,
            dhcp_timeout_ms: 10_000,
            spi_hz: 10_000_000,
        }
    }
}
