//! Watch configuration
//!
//! Everything a board chooses at startup, with the values of the bundled
//! watchface as defaults.

use crate::ntp::NtpConfig;
use crate::style::DialConfig;
use crate::sync::SyncPolicy;
use crate::time::TimeZoneRule;

/// Complete watch configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchConfig {
    pub ntp: NtpConfig,
    pub sync: SyncPolicy,
    pub zone: TimeZoneRule,
    pub dial: DialConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bundled_face() {
        let config = WatchConfig::default();
        assert_eq!(config.ntp.server, "pool.ntp.org");
        assert_eq!(config.ntp.server_port, 123);
        assert_eq!(config.ntp.local_port, 8888);
        assert_eq!(config.ntp.timeout_ms, 1500);
        assert_eq!(config.sync.interval_secs, 24 * 3600 - 2);
        assert!(config.sync.window.is_none());
        assert_eq!(config.zone.standard.name, "GMT");
        assert_eq!(config.zone.daylight.utc_offset_secs, 3600);
        assert_eq!(config.dial.center.x, 85);
        assert_eq!(config.dial.center_dot_radius, 6);
    }
}
