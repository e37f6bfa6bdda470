//! Advertising data encoding and advertising parameters.
//!
//! The advertisement is two AD structures:
//!
//! ```text
//! 02 01 04                      Flags: BR/EDR not supported
//! 1A FF 59 00 <23 bytes>        Manufacturer specific data, company 0x0059
//! ```
//!
//! No device name and no scan response - scanners only ever see the
//! manufacturer data.

use heapless::Vec;

use super::payload::{BeaconPayload, BEACON_PAYLOAD_SIZE};

/// Legacy advertising PDUs carry at most 31 bytes of AD structures.
pub const ADV_DATA_MAX_LEN: usize = 31;

/// AD type: Flags.
pub const AD_TYPE_FLAGS: u8 = 0x01;

/// AD type: Manufacturer Specific Data.
pub const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;

/// Flags bit: BR/EDR not supported.
pub const ADV_FLAG_BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// Encoded length of the full advertisement.
pub const ENCODED_ADV_LEN: usize = 3 + 2 + 2 + BEACON_PAYLOAD_SIZE;

const _: () = assert!(ENCODED_ADV_LEN <= ADV_DATA_MAX_LEN);

/// Encoded advertising data, ready to hand to the stack.
pub type AdvData = Vec<u8, ADV_DATA_MAX_LEN>;

/// Advertising interval resolution, in microseconds.
pub const ADV_INTERVAL_UNIT_US: u32 = 625;

/// Convert milliseconds to 0.625 ms advertising units (truncating,
/// saturating at `u32::MAX`).
pub const fn ms_to_adv_units(ms: u32) -> u32 {
    let units = (ms as u64 * 1000) / ADV_INTERVAL_UNIT_US as u64;
    if units > u32::MAX as u64 {
        u32::MAX
    } else {
        units as u32
    }
}

/// Advertising PDU type. The beacon only ever uses the first variant; the
/// enum keeps the parameter block self-describing in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvKind {
    /// ADV_NONCONN_IND: no connections, no scan requests, no target peer.
    NonConnectableNonScannableUndirected,
}

/// Parameters passed to the stack alongside the advertising data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingParams {
    /// Interval between advertising events, in 0.625 ms units.
    pub interval: u32,
    pub kind: AdvKind,
    /// Advertising duration in 10 ms units; 0 = until stopped.
    pub duration: u16,
}

impl AdvertisingParams {
    /// Undirected, non-connectable, non-scannable, never times out.
    pub const fn beacon(interval_ms: u32) -> Self {
        Self {
            interval: ms_to_adv_units(interval_ms),
            kind: AdvKind::NonConnectableNonScannableUndirected,
            duration: 0,
        }
    }
}

/// Encode the full advertisement for `payload` into `out`.
///
/// `out` is cleared first; on return it holds exactly [`ENCODED_ADV_LEN`]
/// bytes.
pub fn encode(payload: &BeaconPayload, company_id: u16, out: &mut AdvData) {
    out.clear();

    // ENCODED_ADV_LEN <= ADV_DATA_MAX_LEN, so none of these can overflow.
    let _ = out.extend_from_slice(&[2, AD_TYPE_FLAGS, ADV_FLAG_BR_EDR_NOT_SUPPORTED]);

    let manuf_len = (1 + 2 + BEACON_PAYLOAD_SIZE) as u8;
    let _ = out.extend_from_slice(&[manuf_len, AD_TYPE_MANUFACTURER_DATA]);
    let _ = out.extend_from_slice(&company_id.to_le_bytes());
    let _ = out.extend_from_slice(&payload.to_bytes());
}
