//! One wake cycle
//!
//! On every wake the watch reads the RTC, asks the scheduler whether a
//! sync is due, runs at most one NTP exchange, converts to local time and
//! computes the hand polygons. Hands are produced whatever the sync
//! outcome; a stale clock still renders.

use embedded_storage::Storage;
use hal_abstractions::{DatagramTransport, MonotonicMillis, RealTimeClock};

use crate::config::WatchConfig;
use crate::hands::DialHands;
use crate::ntp::{SyncError, TimeSyncClient};
use crate::style::{DialConfig, HandStyle};
use crate::sync::{StoreError, SyncScheduler};
use crate::time::{DaylightSavingRule, LocalTime, TimeZoneResolver, Timestamp};

/// What happened to the network sync during a wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Last sync is recent enough; the network was not touched
    NotDue,
    /// Clock set from the server
    Synced(Timestamp),
    /// Attempt failed; time and schedule are unchanged
    Failed(SyncError),
}

/// Everything the display needs after a wake
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeReport {
    pub utc: Timestamp,
    pub local: LocalTime,
    pub hands: DialHands,
    pub sync: SyncOutcome,
    /// False when the RTC could not be read and the time is a placeholder
    pub clock_valid: bool,
}

/// The watch core: scheduler, client, resolver and dial
pub struct Watch<S, R> {
    client: TimeSyncClient,
    scheduler: SyncScheduler<S>,
    resolver: TimeZoneResolver<R>,
    dial: DialConfig,
}

impl<S: Storage, R: DaylightSavingRule> Watch<S, R> {
    /// Build the watch, loading persisted state from `storage`
    pub fn new(config: WatchConfig, storage: S, dst: R) -> Self {
        Self {
            client: TimeSyncClient::with_config(config.ntp),
            scheduler: SyncScheduler::load(storage, config.sync),
            resolver: TimeZoneResolver::new(config.zone, dst),
            dial: config.dial,
        }
    }

    pub fn scheduler(&self) -> &SyncScheduler<S> {
        &self.scheduler
    }

    pub fn hand_style(&self) -> &'static HandStyle {
        self.scheduler.hand_style()
    }

    /// Switch hand style; persisted only if it changes
    pub fn select_hand_style(&mut self, index: u8) -> Result<bool, StoreError> {
        self.scheduler.set_hand_style(index)
    }

    /// Run one wake cycle
    pub async fn wake<T, C, M>(&mut self, transport: &mut T, rtc: &mut C, mono: &M) -> WakeReport
    where
        T: DatagramTransport,
        C: RealTimeClock,
        M: MonotonicMillis,
    {
        let (mut now, mut clock_valid) = match rtc.now_unix_secs() {
            Ok(secs) => (Timestamp::from_secs(secs), true),
            Err(e) => {
                warn!("RTC read failed: {:?}", defmt_debug(&e));
                (Timestamp::default(), false)
            }
        };

        let sync = if self.scheduler.is_sync_due(now) {
            match self.client.fetch_time(transport, mono).await {
                Ok(ts) => {
                    if rtc.set_unix_time(ts.unix_secs, ts.millis).is_err() {
                        warn!("RTC write failed, keeping synced time for this wake only");
                    }
                    // A failed write is already logged; the sync itself stands
                    let _ = self.scheduler.record_sync(ts);
                    now = ts;
                    clock_valid = true;
                    SyncOutcome::Synced(ts)
                }
                Err(e) => SyncOutcome::Failed(e),
            }
        } else {
            SyncOutcome::NotDue
        };

        let local = self.resolver.to_local(now);
        let civil = local.civil();
        let hands = DialHands::compute(&civil, self.scheduler.hand_style(), &self.dial);
        info!(
            "Local time {}:{}:{} {}",
            civil.hour, civil.minute, civil.second, local.zone
        );

        WakeReport {
            utc: now,
            local,
            hands,
            sync,
            clock_valid,
        }
    }
}

/// RTC errors are only `Debug`; defmt gets the type-erased form
#[cfg(feature = "defmt")]
fn defmt_debug<E: core::fmt::Debug>(e: &E) -> defmt::Debug2Format<'_, E> {
    defmt::Debug2Format(e)
}

#[cfg(not(feature = "defmt"))]
fn defmt_debug<E: core::fmt::Debug>(e: &E) -> &E {
    e
}
