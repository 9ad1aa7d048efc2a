//! Timekeeping on the Feather
//!
//! ## Architecture
//! - Wall-clock time is kept by the STM32 internal RTC on the 32.768 kHz LSE
//! - Between syncs the RTC keeps counting (±20-50ppm accuracy from LSE)
//! - Sync bookkeeping and the hand style persist in the RTC backup registers
//! - Bounded waits use the embassy-time uptime counter

mod calendar;
mod rtc;

use hal_abstractions::MonotonicMillis;

pub use rtc::{initialize_rtc, BackupRegisters, RtcClock};

/// Uptime in milliseconds from the embassy-time driver
#[derive(Debug, Default, Clone, Copy)]
pub struct UptimeMillis;

impl MonotonicMillis for UptimeMillis {
    fn now_millis(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
