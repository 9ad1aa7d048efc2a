//! Persisted watch state and its storage record
//!
//! ```text
//! bytes  0-3   magic "WTCH" (u32 LE)
//! byte   4     record version
//! byte   5     flags, bit 0 = synced at least once
//! bytes  6-13  last sync, Unix seconds (u64 LE)
//! byte  14     active hand-style index
//! byte  15     checksum of bytes 0-14
//! ```

use crate::style::HandStyle;
use crate::time::Timestamp;

pub(crate) const RECORD_MAGIC: u32 = u32::from_le_bytes(*b"WTCH");
pub(crate) const RECORD_VERSION: u8 = 1;
pub(crate) const RECORD_LEN: usize = 16;

const FLAG_SYNCED: u8 = 0x01;

/// State that survives power-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncState {
    /// Last successful sync; `None` means never synced
    pub last_sync: Option<Timestamp>,
    /// Index into [`HandStyle::PRESETS`]
    pub hand_style: u8,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            last_sync: None,
            hand_style: HandStyle::DEFAULT_INDEX,
        }
    }
}

impl SyncState {
    pub(crate) fn to_record(self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        record[4] = RECORD_VERSION;
        if let Some(last) = self.last_sync {
            record[5] = FLAG_SYNCED;
            record[6..14].copy_from_slice(&last.unix_secs.to_le_bytes());
        }
        record[14] = self.hand_style;
        record[RECORD_LEN - 1] = checksum8(&record[..RECORD_LEN - 1]);
        record
    }

    /// `None` for erased, foreign or corrupted records
    pub(crate) fn from_record(record: &[u8; RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != RECORD_MAGIC {
            return None;
        }
        if record[RECORD_LEN - 1] != checksum8(&record[..RECORD_LEN - 1]) {
            return None;
        }
        if record[4] != RECORD_VERSION {
            return None;
        }
        let last_sync = (record[5] & FLAG_SYNCED != 0).then(|| {
            let mut secs = [0u8; 8];
            secs.copy_from_slice(&record[6..14]);
            Timestamp::from_secs(u64::from_le_bytes(secs))
        });
        Some(Self {
            last_sync,
            hand_style: record[14],
        })
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
