//! Calendar date/time conversions using O(1) algorithms
//!
//! Implements Howard Hinnant's civil_from_days and days_from_civil algorithms.
//! Reference: http://howardhinnant.github.io/date_algorithms.html
//!
//! Only what the daylight-saving rules and the hands need: civil fields,
//! weekday, and "last Sunday of the month".

use super::SECS_PER_DAY;

/// Day of week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Weekday of a day count since 1970-01-01 (a Thursday)
    pub fn from_days_since_epoch(days: i64) -> Self {
        match (days + 4).rem_euclid(7) {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    /// Days since the preceding Sunday
    pub fn days_from_sunday(self) -> i64 {
        self as i64
    }
}

/// Broken-down Gregorian date and time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CivilDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: Weekday,
}

impl CivilDateTime {
    /// Break down a Unix timestamp
    ///
    /// Valid range: 1970-2105 (u16 year limit is far beyond that).
    pub fn from_unix(unix_secs: u64) -> Self {
        let days_since_epoch = (unix_secs / SECS_PER_DAY) as i64;
        let secs_today = unix_secs % SECS_PER_DAY;

        let (year, month, day) = civil_from_days(days_since_epoch);

        Self {
            year,
            month,
            day,
            hour: (secs_today / 3600) as u8,
            minute: ((secs_today % 3600) / 60) as u8,
            second: (secs_today % 60) as u8,
            weekday: Weekday::from_days_since_epoch(days_since_epoch),
        }
    }

    /// Back to a Unix timestamp; dates before 1970 saturate at 0
    pub fn to_unix(&self) -> u64 {
        let days = days_from_civil(self.year, self.month, self.day);
        let secs = days * SECS_PER_DAY as i64
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second);
        secs.max(0) as u64
    }
}

/// Check if year is a leap year (Gregorian calendar)
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Unix seconds of 00:00 UTC on the last Sunday of `month`
pub fn last_sunday_of_month(year: u16, month: u8) -> u64 {
    let last_day = days_from_civil(year, month, days_in_month(year, month));
    let back = Weekday::from_days_since_epoch(last_day).days_from_sunday();
    ((last_day - back).max(0) as u64) * SECS_PER_DAY
}

/// Convert days since Unix epoch to civil date (year, month, day)
///
/// Howard Hinnant's civil_from_days algorithm.
pub fn civil_from_days(days_since_epoch: i64) -> (u16, u8, u8) {
    // Shift epoch from 1970-01-01 to 0000-03-01 so the leap day ends the year
    let z = days_since_epoch + 719_468;

    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u32; // day of era [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let y = i64::from(yoe) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // March = 0
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if m <= 2 { y + 1 } else { y };

    (year as u16, m, d)
}

/// Convert civil date (year, month, day) to days since Unix epoch
///
/// Howard Hinnant's days_from_civil algorithm.
pub fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = i64::from(year);
    let m = i64::from(month);
    let d = i64::from(day);

    // March = month 0, February = month 11
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let doy = (153 * m + 2) / 5 + d - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]

    era * 146_097 + doe - 719_468
}
