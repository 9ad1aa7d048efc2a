//! Instants with millisecond precision

/// NTP epoch offset (1900-01-01 to 1970-01-01 in seconds)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// An instant in UTC with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Unix timestamp in seconds since epoch (1970-01-01 00:00:00 UTC)
    pub unix_secs: u64,
    /// Milliseconds component (0-999)
    pub millis: u16,
}

impl Timestamp {
    /// Create a new timestamp, folding whole seconds out of `millis`
    pub const fn new(unix_secs: u64, millis: u16) -> Self {
        Self {
            unix_secs: unix_secs.saturating_add((millis / 1000) as u64),
            millis: millis % 1000,
        }
    }

    /// Timestamp on a whole second
    pub const fn from_secs(unix_secs: u64) -> Self {
        Self::new(unix_secs, 0)
    }

    /// Convert from NTP seconds since 1900-01-01 and the high 16 bits of
    /// the NTP fraction (units of 2^-16 s)
    ///
    /// Seconds below the 1970 offset belong to NTP era 1, which began on
    /// 2036-02-07 06:28:16 UTC.
    pub fn from_ntp(ntp_secs: u32, frac_hi16: u16) -> Self {
        let unix_secs = u64::from(ntp_secs.wrapping_sub(NTP_UNIX_OFFSET as u32));
        let millis = ((u32::from(frac_hi16) * 1000) >> 16) as u16;
        Self::new(unix_secs, millis)
    }

    /// Whole seconds elapsed since `earlier`, or `None` if `earlier` is later
    pub fn secs_since(&self, earlier: Timestamp) -> Option<u64> {
        self.unix_secs.checked_sub(earlier.unix_secs)
    }

    /// Shift by a signed number of seconds, saturating at the epoch
    pub fn offset_by(&self, secs: i64) -> Self {
        let unix_secs = if secs >= 0 {
            self.unix_secs.saturating_add(secs as u64)
        } else {
            self.unix_secs.saturating_sub(secs.unsigned_abs())
        };
        Self {
            unix_secs,
            millis: self.millis,
        }
    }

    /// Nearest whole second, for clocks with one-second resolution
    pub fn rounded_secs(&self) -> u64 {
        if self.millis >= 500 {
            self.unix_secs.saturating_add(1)
        } else {
            self.unix_secs
        }
    }

    /// Seconds elapsed since local midnight if this is a wall-clock instant
    pub fn secs_of_day(&self) -> u64 {
        self.unix_secs % super::SECS_PER_DAY
    }
}
