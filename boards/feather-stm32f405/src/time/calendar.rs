//! Conversions between the RTC's `DateTime` and the watch calendar
//!
//! The calendar math itself lives in `watch_core::time::calendar`
//! (O(1) civil_from_days / days_from_civil); this module only maps fields.

use embassy_stm32::rtc::{DateTime, DayOfWeek, DateTimeError};
use watch_core::time::{CivilDateTime, Weekday};

fn day_of_week(weekday: Weekday) -> DayOfWeek {
    match weekday {
        Weekday::Monday => DayOfWeek::Monday,
        Weekday::Tuesday => DayOfWeek::Tuesday,
        Weekday::Wednesday => DayOfWeek::Wednesday,
        Weekday::Thursday => DayOfWeek::Thursday,
        Weekday::Friday => DayOfWeek::Friday,
        Weekday::Saturday => DayOfWeek::Saturday,
        Weekday::Sunday => DayOfWeek::Sunday,
    }
}

/// Convert Unix seconds to an RTC `DateTime`
///
/// Valid range: 2000-2099, the RTC stores a two-digit year.
pub fn unix_to_datetime(unix_secs: u64) -> Result<DateTime, DateTimeError> {
    let civil = CivilDateTime::from_unix(unix_secs);
    DateTime::from(
        civil.year,
        civil.month,
        civil.day,
        day_of_week(civil.weekday),
        civil.hour,
        civil.minute,
        civil.second,
        0, // microsecond
    )
}

/// Convert an RTC `DateTime` to Unix seconds
pub fn datetime_to_unix(dt: &DateTime) -> u64 {
    let year = dt.year();
    let month = dt.month();
    let day = dt.day();
    CivilDateTime {
        year,
        month,
        day,
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
        weekday: Weekday::from_days_since_epoch(watch_core::time::calendar::days_from_civil(
            year, month, day,
        )),
    }
    .to_unix()
}
