//! Network time synchronisation
//!
//! - **`config`**: server, ports and receive window with `Default`
//! - **`error`**: [`SyncError`], the only error a sync attempt reports
//! - **`packet`**: 48-byte request/response layout
//! - **`client`**: one request/response exchange over a transport
//!
//! A sync attempt is a single exchange: one connection attempt, one
//! request, a bounded wait. Retrying is the scheduler's business on the
//! next wake.

pub mod client;
pub mod config;
pub mod error;
pub mod packet;

pub use client::TimeSyncClient;
pub use config::NtpConfig;
pub use error::SyncError;
pub use packet::{ServerTime, NTP_PACKET_SIZE};
