//! Application-wide constants and compile-time configuration.
//!
//! Beacon identity, payload defaults and timing parameters live here so
//! they can be tuned in one place.

// Beacon payload

/// Company identifier carried in the manufacturer-specific AD structure.
/// 0x0059 = Nordic Semiconductor ASA (Bluetooth SIG assigned number).
pub const COMPANY_IDENTIFIER: u16 = 0x0059;

/// Device type tag at the start of the manufacturer data (0x02 = beacon).
pub const DEVICE_TYPE: u8 = 0x02;

/// Length of the beacon data that follows the length byte.
pub const BEACON_DATA_LENGTH: u8 = 0x15;

/// Proprietary 128-bit beacon UUID, in transmission order.
#[rustfmt::skip]
pub const BEACON_UUID: [u8; 16] = [
    0x01, 0x12, 0x23, 0x34,
    0x45, 0x56, 0x67, 0x78,
    0x89, 0x9a, 0xab, 0xbc,
    0xcd, 0xde, 0xef, 0xf0,
];

/// Major value broadcast until the first update carrying application data.
pub const DEFAULT_MAJOR: u16 = 0x0102;

/// Minor value broadcast until the first update carrying application data.
pub const DEFAULT_MINOR: u16 = 0x0304;

/// Measured RSSI at 1 m, in dBm (two's complement, 0xC3 = -61 dBm).
pub const MEASURED_RSSI: u8 = 0xC3;

// Advertising

/// SoftDevice connection configuration tag used when starting advertising.
pub const CONN_CFG_TAG: u8 = 1;

/// Default interval between advertising events (ms).
pub const DEFAULT_ADV_INTERVAL_MS: u32 = 100;

// Application

/// Depth of the command channel feeding the beacon task.
pub const COMMAND_CHANNEL_DEPTH: usize = 4;

/// How often the demo producer publishes fresh data (seconds).
pub const DEMO_UPDATE_PERIOD_SECS: u64 = 5;

// GPIO pin assignments (XM122 module)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` pin is
// selected in `main.rs`.
//
//   Status LED (active-low) → P0.13

/// The XM122 status LED sinks current: driving the pin low lights it.
pub const STATUS_LED_ACTIVE_LOW: bool = true;
