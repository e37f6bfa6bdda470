//! Library interface for the XM122 beacon firmware.
//!
//! Everything that does not touch the SoftDevice or the chip lives here so
//! it can be tested on the host (no embedded hardware required):
//! the beacon payload, advertising-data encoding, the lifecycle controller
//! and the status LED driver.
//!
//! Usage: `cargo test --lib` / `cargo test --test integration`
//!
//! Note: The embedded binary (`main.rs`, feature `embedded`) builds on this
//! library and adds the SoftDevice radio and the reset-on-fault handler.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod beacon;
pub mod config;
pub mod dfu_key;
pub mod error;
pub mod indicator;

pub use beacon::{
    BeaconCommand, BeaconConfig, BeaconController, BeaconPayload, BeaconState, FaultPolicy,
    StopFaultPolicy,
};
pub use error::{Error, StackFault, StackOp};
