//! Platform-agnostic core logic for the analog e-paper watch
//!
//! This crate contains the timekeeping and geometry logic shared by every
//! supported board. It has NO hardware dependencies; boards plug in through
//! the traits in `hal-abstractions` and `embedded-storage`.
//!
//! - **`trig`**: ×1000 fixed-point sine/cosine from a 90-entry table
//! - **`hands`**: hand tip and polygon coordinates
//! - **`ntp`**: 48-byte NTP exchange over a [`DatagramTransport`]
//! - **`time`**: timestamps, calendar math and timezone resolution
//! - **`sync`**: sync scheduling and persisted state
//! - **`watch`**: one wake cycle tying the above together
//!
//! [`DatagramTransport`]: hal_abstractions::DatagramTransport

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

#[macro_use]
mod fmt;

pub mod config;
pub mod hands;
pub mod ntp;
pub mod style;
pub mod sync;
pub mod time;
pub mod trig;
pub mod watch;

pub use config::WatchConfig;
pub use hands::{hand_endpoint, hand_polygon, DialHands, HandAngles, HandShape};
pub use ntp::{NtpConfig, SyncError, TimeSyncClient};
pub use style::{DialConfig, HandDims, HandStyle};
pub use sync::{SyncPolicy, SyncScheduler, SyncState, SyncWindow};
pub use time::{LocalTime, TimeZoneResolver, TimeZoneRule, Timestamp};
pub use trig::{cos_k, from_k, sin_k};
pub use watch::{SyncOutcome, WakeReport, Watch};

#[cfg(test)]
mod testing;
