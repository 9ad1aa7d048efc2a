//! NTP packet layout
//!
//! Only the fields a client-mode SNTP exchange needs are touched:
//!
//! ```text
//! byte  0      LI | VN | Mode        0xE3 in requests
//! byte  2      poll interval         6
//! byte  3      precision             0xEC
//! bytes 12-15  reference identifier  "1N14"
//! bytes 40-43  transmit seconds      big-endian, since 1900-01-01
//! bytes 44-45  transmit fraction     high 16 bits, units of 2^-16 s
//! ```

use crate::time::Timestamp;

/// NTP time is in the first 48 bytes of the message
pub const NTP_PACKET_SIZE: usize = 48;

/// LI = 3 (unsynchronised), VN = 4, Mode = 3 (client)
const LI_VN_MODE: u8 = 0b1110_0011;
const POLL_INTERVAL: u8 = 6;
const PRECISION: u8 = 0xEC;
const REFERENCE_ID: [u8; 4] = [49, 0x4E, 49, 52];

const TRANSMIT_SECS: usize = 40;
const TRANSMIT_FRAC: usize = 44;

/// Build a client request
pub fn build_request() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = LI_VN_MODE;
    packet[1] = 0; // stratum
    packet[2] = POLL_INTERVAL;
    packet[3] = PRECISION;
    // bytes 4-11: root delay and root dispersion stay zero
    packet[12..16].copy_from_slice(&REFERENCE_ID);
    packet
}

/// Transmit timestamp carried by a server reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServerTime {
    /// Seconds since 1900-01-01
    pub ntp_secs: u32,
    /// High 16 bits of the fraction
    pub frac_hi16: u16,
}

impl ServerTime {
    /// Parse a reply; `None` if it is shorter than 48 bytes or carries no
    /// transmit time
    ///
    /// Undersized packets are never partially read.
    pub fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < NTP_PACKET_SIZE {
            return None;
        }
        let ntp_secs = u32::from_be_bytes([
            packet[TRANSMIT_SECS],
            packet[TRANSMIT_SECS + 1],
            packet[TRANSMIT_SECS + 2],
            packet[TRANSMIT_SECS + 3],
        ]);
        let frac_hi16 = u16::from_be_bytes([packet[TRANSMIT_FRAC], packet[TRANSMIT_FRAC + 1]]);
        if ntp_secs == 0 {
            return None;
        }
        Some(Self {
            ntp_secs,
            frac_hi16,
        })
    }

    /// Unix time of the reply
    pub fn timestamp(&self) -> Timestamp {
        Timestamp::from_ntp(self.ntp_secs, self.frac_hi16)
    }
}

#[cfg(test)]
pub(crate) fn response_with(ntp_secs: u32, frac_hi16: u16) -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = 0x24; // LI = 0, VN = 4, Mode = 4 (server)
    packet[1] = 2;
    packet[TRANSMIT_SECS..TRANSMIT_SECS + 4].copy_from_slice(&ntp_secs.to_be_bytes());
    packet[TRANSMIT_FRAC..TRANSMIT_FRAC + 2].copy_from_slice(&frac_hi16.to_be_bytes());
    packet
}
