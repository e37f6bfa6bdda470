//! Bluetooth LE beacon subsystem.
//!
//! This module drives a non-connectable, non-scannable advertiser:
//!
//! 1. **Payload** - the 23-byte manufacturer data record carrying two
//!    16-bit application values.
//! 2. **Advertising data** - AD-structure encoding and advertising
//!    parameters derived from a millisecond interval.
//! 3. **Controller** - the init / update / stop lifecycle on top of a
//!    radio stack capability.
//!
//! The radio stack, the status indicator and the fatal-error handler are
//! reached through the traits below so the lifecycle runs unchanged on the
//! host with test doubles.

pub mod adv_data;
pub mod controller;
pub mod payload;

#[cfg(test)]
mod tests;

pub use adv_data::{AdvData, AdvertisingParams};
pub use controller::{BeaconConfig, BeaconController, BeaconState, FaultPolicy, StopFaultPolicy};
pub use payload::BeaconPayload;

use crate::error::StackFault;

/// Advertising set handle assigned by the radio stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvHandle(pub u8);

/// Radio stack capability consumed by the controller.
///
/// All calls are synchronous from the controller's point of view.
pub trait RadioStack {
    /// Bring the stack up. Called at most once per controller.
    fn enable(&mut self) -> Result<(), StackFault>;

    /// Validate and store an advertising set. `handle` is `None` the first
    /// time; afterwards the previously returned handle is passed back so the
    /// same set is reconfigured.
    fn configure_advertisement(
        &mut self,
        handle: Option<AdvHandle>,
        adv_data: &[u8],
        params: &AdvertisingParams,
    ) -> Result<AdvHandle, StackFault>;

    fn start_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault>;

    fn stop_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault>;
}

/// What the external status indicator should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    Idle,
    Advertising,
}

/// Best-effort status signal (typically an LED).
pub trait StatusIndicator {
    fn set(&mut self, state: IndicatorState);
}

/// Receives faults the controller is configured to treat as fatal.
///
/// On target this logs and resets the chip and never returns. If it does
/// return, the controller reports the fault to its caller.
pub trait FatalErrorHandler {
    fn on_fatal(&mut self, fault: StackFault);
}

/// Commands the control loop feeds into the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconCommand {
    /// Bring the radio stack up.
    Init,
    /// (Re)start advertising with a new interval and, optionally, new data.
    Update {
        interval_ms: u32,
        data1: Option<u16>,
        data2: Option<u16>,
    },
    /// Stop advertising.
    Stop,
}
