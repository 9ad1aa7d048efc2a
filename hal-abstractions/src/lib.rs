//! Hardware abstraction traits for the watch firmware
//!
//! This crate defines traits that abstract over hardware differences
//! between boards. BSPs implement these traits; `watch-core` consumes them.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod monotonic;
pub mod network;
pub mod rtc;

pub use monotonic::MonotonicMillis;
pub use network::DatagramTransport;
pub use rtc::RealTimeClock;
