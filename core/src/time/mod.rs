//! Time representation, calendar math and timezone resolution
//!
//! ## Architecture
//! - [`Timestamp`] is the single instant type: Unix seconds plus milliseconds
//! - [`calendar`] turns Unix seconds into a civil date/time and back using
//!   O(1) algorithms (Howard Hinnant's civil_from_days / days_from_civil)
//! - [`zone`] applies a standard/daylight offset chosen by a pluggable
//!   daylight-saving rule
//!
//! Limitations:
//! - Proleptic Gregorian calendar, no leap seconds (NTP ignores them too)
//! - No locale handling; zone names are fixed labels

pub mod calendar;
pub mod timestamp;
pub mod zone;

pub use calendar::{CivilDateTime, Weekday};
pub use timestamp::Timestamp;
pub use zone::{
    DaylightSavingRule, EuropeanSummerTime, LocalTime, NoDaylightSaving, TimeZoneResolver,
    TimeZoneRule, ZoneOffset,
};

/// Seconds in one hour
pub const SECS_PER_HOUR: u64 = 3600;

/// Seconds in one day
pub const SECS_PER_DAY: u64 = 86_400;
