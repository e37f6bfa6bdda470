//! Beacon manufacturer data - the 23 bytes scanners actually see.
//!
//! Layout (after the company identifier):
//!
//! | Offset | Size | Field                    |
//! |--------|------|--------------------------|
//! | 0      | 1    | Device type (0x02)       |
//! | 1      | 1    | Data length (0x15)       |
//! | 2      | 16   | Proprietary UUID         |
//! | 18     | 2    | Major, big-endian        |
//! | 20     | 2    | Minor, big-endian        |
//! | 22     | 1    | Measured RSSI at 1 m     |
//!
//! Major/minor double as the application-data region: `data1` and `data2`
//! land there on update.

use crate::config::{
    BEACON_DATA_LENGTH, BEACON_UUID, DEFAULT_MAJOR, DEFAULT_MINOR, DEVICE_TYPE, MEASURED_RSSI,
};

/// Serialized size of the beacon manufacturer data.
pub const BEACON_PAYLOAD_SIZE: usize = 23;

/// Offset of the application-data region (`data1` MSB).
pub const APP_DATA_OFFSET: usize = 18;

/// Size of the application-data region (`data1` + `data2`).
pub const APP_DATA_SIZE: usize = 4;

/// Structured view of the beacon manufacturer data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconPayload {
    pub device_type: u8,
    pub data_length: u8,
    pub uuid: [u8; 16],
    pub major: u16,
    pub minor: u16,
    pub measured_rssi: u8,
}

impl BeaconPayload {
    /// Payload with the factory identity and default major/minor.
    pub const fn new() -> Self {
        Self {
            device_type: DEVICE_TYPE,
            data_length: BEACON_DATA_LENGTH,
            uuid: BEACON_UUID,
            major: DEFAULT_MAJOR,
            minor: DEFAULT_MINOR,
            measured_rssi: MEASURED_RSSI,
        }
    }

    /// Store two application values in the major/minor slots.
    pub fn set_app_data(&mut self, data1: u16, data2: u16) {
        self.major = data1;
        self.minor = data2;
    }

    /// Apply an update request: both values must be present, otherwise the
    /// previous contents are kept. Returns `true` if the values were replaced.
    pub fn apply(&mut self, data1: Option<u16>, data2: Option<u16>) -> bool {
        match data1.zip(data2) {
            Some((d1, d2)) => {
                self.set_app_data(d1, d2);
                true
            }
            None => false,
        }
    }

    /// Serialize into the on-air byte layout.
    pub fn to_bytes(&self) -> [u8; BEACON_PAYLOAD_SIZE] {
        let mut buf = [0u8; BEACON_PAYLOAD_SIZE];
        buf[0] = self.device_type;
        buf[1] = self.data_length;
        buf[2..APP_DATA_OFFSET].copy_from_slice(&self.uuid);
        let (major, minor) = buf[APP_DATA_OFFSET..APP_DATA_OFFSET + APP_DATA_SIZE].split_at_mut(2);
        major.copy_from_slice(&self.major.to_be_bytes());
        minor.copy_from_slice(&self.minor.to_be_bytes());
        buf[APP_DATA_OFFSET + APP_DATA_SIZE] = self.measured_rssi;
        buf
    }
}

impl Default for BeaconPayload {
    fn default() -> Self {
        Self::new()
    }
}
