//! Time-sync error types

/// Why a sync attempt produced no time
///
/// All variants are non-fatal: the caller keeps its previous time and
/// schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Link could not be brought up, or resolve/bind/send failed
    NetworkUnavailable,
    /// Nothing arrived within the receive window
    SyncTimeout,
    /// Only undersized or invalid packets arrived within the window
    MalformedResponse,
}

impl core::fmt::Display for SyncError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(f, "Network unavailable"),
            Self::SyncTimeout => write!(f, "No time response before deadline"),
            Self::MalformedResponse => write!(f, "Malformed time response"),
        }
    }
}

impl core::error::Error for SyncError {}
