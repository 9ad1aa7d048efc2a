//! RTC (Real-Time Clock) wrapper and backup-register storage
//!
//! The hardware RTC lives in a global critical-section mutex so the clock
//! and the backup-register store can share it.

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{info, Format};
use embassy_stm32::rtc::Rtc;
use embedded_storage::{ReadStorage, Storage};
use hal_abstractions::RealTimeClock;
use watch_core::Timestamp;

use super::calendar::{datetime_to_unix, unix_to_datetime};

/// Global internal RTC instance
static RTC: Mutex<RefCell<Option<Rtc>>> = Mutex::new(RefCell::new(None));

/// Backup registers on the STM32F405 (RTC_BKP0R..RTC_BKP19R)
const BACKUP_REGISTERS: usize = 20;

/// RTC operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum RtcError {
    /// RTC not initialized
    NotInitialized,
    /// RTC hardware error
    HardwareError,
    /// Time outside what the RTC calendar can hold
    InvalidDate,
    /// Access beyond the backup registers
    OutOfRange,
}

/// Initialize internal RTC
///
/// Must be called once during system initialization before any time operations.
pub fn initialize_rtc(rtc: Rtc) {
    critical_section::with(|cs| {
        RTC.borrow(cs).replace(Some(rtc));
    });
    info!("Internal RTC initialized");
}

fn with_rtc<R>(f: impl FnOnce(&mut Rtc) -> Result<R, RtcError>) -> Result<R, RtcError> {
    critical_section::with(|cs| match RTC.borrow(cs).borrow_mut().as_mut() {
        Some(rtc) => f(rtc),
        None => Err(RtcError::NotInitialized),
    })
}

/// Wall clock backed by the LSE-driven RTC (1 s resolution)
#[derive(Debug, Default, Clone, Copy)]
pub struct RtcClock;

impl RealTimeClock for RtcClock {
    type Error = RtcError;

    fn now_unix_secs(&mut self) -> Result<u64, Self::Error> {
        with_rtc(|rtc| {
            let datetime = rtc.now().map_err(|_| RtcError::HardwareError)?;
            Ok(datetime_to_unix(&datetime))
        })
    }

    /// Rounds to the nearest second
    fn set_unix_time(&mut self, unix_secs: u64, millis: u16) -> Result<(), Self::Error> {
        let secs = Timestamp::new(unix_secs, millis).rounded_secs();
        let datetime = unix_to_datetime(secs).map_err(|_| RtcError::InvalidDate)?;
        with_rtc(|rtc| rtc.set_datetime(datetime).map_err(|_| RtcError::HardwareError))
    }
}

/// Byte-addressed [`Storage`] over the RTC backup registers
///
/// The registers survive standby and resets while VBAT is present; a
/// backup-domain reset clears them to zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackupRegisters;

impl BackupRegisters {
    fn check(offset: u32, len: usize) -> Result<usize, RtcError> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= BACKUP_REGISTERS * 4 => Ok(start),
            _ => Err(RtcError::OutOfRange),
        }
    }
}

impl ReadStorage for BackupRegisters {
    type Error = RtcError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = Self::check(offset, bytes.len())?;
        with_rtc(|rtc| {
            for (i, byte) in bytes.iter_mut().enumerate() {
                let pos = start + i;
                let word = rtc.read_backup_register(pos / 4).ok_or(RtcError::OutOfRange)?;
                *byte = word.to_le_bytes()[pos % 4];
            }
            Ok(())
        })
    }

    fn capacity(&self) -> usize {
        BACKUP_REGISTERS * 4
    }
}

impl Storage for BackupRegisters {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = Self::check(offset, bytes.len())?;
        with_rtc(|rtc| {
            for (i, &byte) in bytes.iter().enumerate() {
                let pos = start + i;
                let register = pos / 4;
                let mut word = rtc
                    .read_backup_register(register)
                    .ok_or(RtcError::OutOfRange)?
                    .to_le_bytes();
                word[pos % 4] = byte;
                rtc.write_backup_register(register, u32::from_le_bytes(word));
            }
            Ok(())
        })
    }
}
