//! Timezone and daylight-saving resolution
//!
//! A [`TimeZoneRule`] pairs a standard and a daylight [`ZoneOffset`]; which
//! one applies is decided by an injected [`DaylightSavingRule`].

use super::calendar::{last_sunday_of_month, CivilDateTime};
use super::{Timestamp, SECS_PER_HOUR};

/// A named offset from UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneOffset {
    /// Label shown on the face, e.g. "BST"
    pub name: &'static str,
    /// Seconds added to UTC
    pub utc_offset_secs: i32,
}

impl ZoneOffset {
    pub const fn new(name: &'static str, utc_offset_secs: i32) -> Self {
        Self {
            name,
            utc_offset_secs,
        }
    }
}

/// Decides whether daylight-saving time is in force at a UTC instant
pub trait DaylightSavingRule {
    fn is_daylight_saving(&self, utc: Timestamp) -> bool;
}

impl<F> DaylightSavingRule for F
where
    F: Fn(Timestamp) -> bool,
{
    fn is_daylight_saving(&self, utc: Timestamp) -> bool {
        self(utc)
    }
}

/// Standard time all year round
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDaylightSaving;

impl DaylightSavingRule for NoDaylightSaving {
    fn is_daylight_saving(&self, _utc: Timestamp) -> bool {
        false
    }
}

/// EU/UK summer time: from 01:00 UTC on the last Sunday of March until
/// 01:00 UTC on the last Sunday of October
#[derive(Debug, Clone, Copy, Default)]
pub struct EuropeanSummerTime;

impl DaylightSavingRule for EuropeanSummerTime {
    fn is_daylight_saving(&self, utc: Timestamp) -> bool {
        let year = CivilDateTime::from_unix(utc.unix_secs).year;
        let start = last_sunday_of_month(year, 3) + SECS_PER_HOUR;
        let end = last_sunday_of_month(year, 10) + SECS_PER_HOUR;
        (start..end).contains(&utc.unix_secs)
    }
}

/// Standard and daylight offsets of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeZoneRule {
    pub standard: ZoneOffset,
    pub daylight: ZoneOffset,
}

impl TimeZoneRule {
    /// Greenwich Mean Time / British Summer Time
    pub const UK: TimeZoneRule = TimeZoneRule {
        standard: ZoneOffset::new("GMT", 0),
        daylight: ZoneOffset::new("BST", SECS_PER_HOUR as i32),
    };

    /// Central European Time / Central European Summer Time
    pub const CENTRAL_EUROPE: TimeZoneRule = TimeZoneRule {
        standard: ZoneOffset::new("CET", SECS_PER_HOUR as i32),
        daylight: ZoneOffset::new("CEST", 2 * SECS_PER_HOUR as i32),
    };
}

impl Default for TimeZoneRule {
    fn default() -> Self {
        Self::UK
    }
}

/// A UTC instant converted to wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    /// Wall-clock time expressed on the Unix time line
    pub local: Timestamp,
    /// Label of the applied offset
    pub zone: &'static str,
    /// Offset that was added to UTC
    pub offset_secs: i32,
}

impl LocalTime {
    /// Broken-down wall-clock fields
    pub fn civil(&self) -> CivilDateTime {
        CivilDateTime::from_unix(self.local.unix_secs)
    }
}

/// Converts UTC instants to local time
pub struct TimeZoneResolver<R = EuropeanSummerTime> {
    rule: TimeZoneRule,
    dst: R,
}

impl TimeZoneResolver<EuropeanSummerTime> {
    /// UK time with the European summer-time calendar
    pub fn uk() -> Self {
        Self::new(TimeZoneRule::UK, EuropeanSummerTime)
    }
}

impl<R: DaylightSavingRule> TimeZoneResolver<R> {
    pub fn new(rule: TimeZoneRule, dst: R) -> Self {
        Self { rule, dst }
    }

    pub fn rule(&self) -> &TimeZoneRule {
        &self.rule
    }

    /// Apply the offset in force at `utc`
    pub fn to_local(&self, utc: Timestamp) -> LocalTime {
        let zone = if self.dst.is_daylight_saving(utc) {
            self.rule.daylight
        } else {
            self.rule.standard
        };
        LocalTime {
            local: utc.offset_by(i64::from(zone.utc_offset_secs)),
            zone: zone.name,
            offset_secs: zone.utc_offset_secs,
        }
    }
}
