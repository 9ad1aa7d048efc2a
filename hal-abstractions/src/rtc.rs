//! Real-time clock abstraction
//!
//! The board keeps counting wall-clock time while the rest of the system
//! sleeps. Time is exchanged as Unix seconds (UTC) so this crate stays free
//! of calendar types.

use core::fmt::Debug;

/// Battery-backed wall clock
pub trait RealTimeClock {
    /// Error reported by the clock hardware
    type Error: Debug;

    /// Current UTC time in seconds since 1970-01-01
    fn now_unix_secs(&mut self) -> Result<u64, Self::Error>;

    /// Set the clock to the given UTC time
    ///
    /// `millis` is the sub-second part (0-999). Clocks with one-second
    /// resolution decide themselves how to account for it.
    fn set_unix_time(&mut self, unix_secs: u64, millis: u16) -> Result<(), Self::Error>;
}
