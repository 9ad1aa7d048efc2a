//! Sync scheduler and state persistence

use embedded_storage::Storage;

use super::policy::SyncPolicy;
use super::state::{SyncState, RECORD_LEN};
use crate::style::HandStyle;
use crate::time::Timestamp;

/// State persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Underlying storage rejected the write
    WriteFailed,
    /// Hand-style index has no preset
    UnknownStyle,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "State write failed"),
            Self::UnknownStyle => write!(f, "Unknown hand style"),
        }
    }
}

impl core::error::Error for StoreError {}

/// Decides when to sync and owns the persisted [`SyncState`]
///
/// # Example
/// ```ignore
/// let mut scheduler = SyncScheduler::load(backup_registers, SyncPolicy::default());
/// if scheduler.is_sync_due(now) {
///     if let Ok(ts) = client.fetch_time(&mut transport, &mono).await {
///         scheduler.record_sync(ts)?;
///     }
/// }
/// ```
pub struct SyncScheduler<S> {
    storage: S,
    offset: u32,
    policy: SyncPolicy,
    state: SyncState,
}

impl<S: Storage> SyncScheduler<S> {
    /// Load persisted state from the start of `storage`
    pub fn load(storage: S, policy: SyncPolicy) -> Self {
        Self::load_at(storage, 0, policy)
    }

    /// Load persisted state from `offset` in `storage`
    ///
    /// Blank, corrupted or unreadable storage yields the default state.
    pub fn load_at(mut storage: S, offset: u32, policy: SyncPolicy) -> Self {
        let mut record = [0u8; RECORD_LEN];
        let state = match storage.read(offset, &mut record) {
            Ok(()) => SyncState::from_record(&record).unwrap_or_else(|| {
                info!("No valid persisted state, starting unsynced");
                SyncState::default()
            }),
            Err(_) => {
                warn!("Persisted state unreadable, starting unsynced");
                SyncState::default()
            }
        };
        if let Some(last) = state.last_sync {
            info!("Last sync at {} UTC", last.unix_secs);
        }
        Self {
            storage,
            offset,
            policy,
            state,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Whether a sync attempt should run at `now`
    pub fn is_sync_due(&self, now: Timestamp) -> bool {
        self.policy.is_sync_due(now, &self.state)
    }

    /// Record a successful sync and persist it
    ///
    /// The in-memory state is updated even if the write fails.
    pub fn record_sync(&mut self, synced_at: Timestamp) -> Result<(), StoreError> {
        self.state.last_sync = Some(synced_at);
        self.save()
    }

    /// Active hand style
    pub fn hand_style(&self) -> &'static HandStyle {
        HandStyle::by_index(self.state.hand_style)
    }

    /// Select a hand style, persisting only when it changes
    ///
    /// Returns whether anything was written.
    pub fn set_hand_style(&mut self, index: u8) -> Result<bool, StoreError> {
        if usize::from(index) >= HandStyle::PRESETS.len() {
            return Err(StoreError::UnknownStyle);
        }
        if self.state.hand_style == index {
            return Ok(false);
        }
        self.state.hand_style = index;
        self.save().map(|()| true)
    }

    /// Give the storage back
    pub fn release(self) -> S {
        self.storage
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.storage
            .write(self.offset, &self.state.to_record())
            .map_err(|_| {
                error!("Failed to persist watch state");
                StoreError::WriteFailed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RamStorage;

    const T0: u64 = 1_704_067_200;

    #[test]
    fn test_blank_storage_starts_unsynced() {
        let scheduler = SyncScheduler::load(RamStorage::default(), SyncPolicy::default());
        assert_eq!(scheduler.state(), &SyncState::default());
        assert!(scheduler.is_sync_due(Timestamp::from_secs(T0)));
        assert_eq!(scheduler.hand_style().name, "slim");
    }

    #[test]
    fn test_sync_survives_reload() {
        let mut scheduler = SyncScheduler::load(RamStorage::default(), SyncPolicy::default());
        scheduler.record_sync(Timestamp::new(T0, 640)).unwrap();
        assert!(!scheduler.is_sync_due(Timestamp::from_secs(T0 + 60)));

        let reloaded = SyncScheduler::load(scheduler.release(), SyncPolicy::default());
        assert_eq!(reloaded.state().last_sync, Some(Timestamp::from_secs(T0)));
        assert!(!reloaded.is_sync_due(Timestamp::from_secs(T0 + 60)));
        assert!(reloaded.is_sync_due(Timestamp::from_secs(T0 + 86_398)));
    }

    #[test]
    fn test_hand_style_saved_only_on_change() {
        let mut scheduler = SyncScheduler::load(RamStorage::default(), SyncPolicy::default());
        assert_eq!(scheduler.set_hand_style(1), Ok(false));
        assert_eq!(scheduler.set_hand_style(0), Ok(true));
        assert_eq!(scheduler.set_hand_style(0), Ok(false));
        assert_eq!(scheduler.set_hand_style(9), Err(StoreError::UnknownStyle));

        let storage = scheduler.release();
        assert_eq!(storage.writes, 1);
        let reloaded = SyncScheduler::load(storage, SyncPolicy::default());
        assert_eq!(reloaded.hand_style().name, "bold");
        assert_eq!(reloaded.state().last_sync, None);
    }

    #[test]
    fn test_style_change_keeps_sync_state() {
        let mut scheduler = SyncScheduler::load(RamStorage::default(), SyncPolicy::default());
        scheduler.record_sync(Timestamp::from_secs(T0)).unwrap();
        scheduler.set_hand_style(0).unwrap();

        let reloaded = SyncScheduler::load(scheduler.release(), SyncPolicy::default());
        assert_eq!(reloaded.state().last_sync, Some(Timestamp::from_secs(T0)));
        assert_eq!(reloaded.state().hand_style, 0);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = RamStorage {
            fail_writes: true,
            ..RamStorage::default()
        };
        let mut scheduler = SyncScheduler::load(storage, SyncPolicy::default());
        assert_eq!(
            scheduler.record_sync(Timestamp::from_secs(T0)),
            Err(StoreError::WriteFailed)
        );
        assert!(!scheduler.is_sync_due(Timestamp::from_secs(T0 + 1)));
    }

    #[test]
    fn test_offset_region() {
        let mut scheduler = SyncScheduler::load_at(RamStorage::default(), 16, SyncPolicy::default());
        scheduler.record_sync(Timestamp::from_secs(T0)).unwrap();
        let storage = scheduler.release();
        assert!(storage.bytes[..16].iter().all(|&b| b == 0xFF));
        let reloaded = SyncScheduler::load_at(storage, 16, SyncPolicy::default());
        assert!(reloaded.state().last_sync.is_some());
    }
}
