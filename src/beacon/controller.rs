//! Beacon lifecycle controller.
//!
//! Two flags drive everything: `stack_ready` (set once, never cleared) and
//! `advertising` (toggled by `update` / `stop`).
//!
//! ```text
//!  Uninitialized --init--> StackReady <--update/stop--> Advertising
//! ```
//!
//! Every operation runs to completion on the caller's context. The
//! controller is meant to be owned by a single control loop; it holds no
//! locks and touches no globals.

use super::adv_data::{self, AdvData, AdvertisingParams};
use super::payload::BeaconPayload;
use super::{
    AdvHandle, BeaconCommand, FatalErrorHandler, IndicatorState, RadioStack, StatusIndicator,
};
use crate::config::COMPANY_IDENTIFIER;
use crate::error::{Error, StackFault};

/// What to do when the radio stack fails during `init` or `update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultPolicy {
    /// Hand the fault to the fatal-error handler, then report it.
    Halt,
    /// Report the fault to the caller only.
    Report,
}

/// What to do when the radio stack fails to stop advertising in `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopFaultPolicy {
    /// Hand the fault to the fatal-error handler, then report it.
    Halt,
    /// Report the fault to the caller; the beacon is still considered
    /// advertising.
    Report,
    /// Log it, consider the beacon stopped and return success.
    Ignore,
}

/// Controller configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconConfig {
    /// Company identifier placed in front of the manufacturer data.
    pub company_id: u16,
    pub on_fault: FaultPolicy,
    pub on_stop_fault: StopFaultPolicy,
}

impl BeaconConfig {
    /// Every stack failure is fatal.
    pub const fn new() -> Self {
        Self {
            company_id: COMPANY_IDENTIFIER,
            on_fault: FaultPolicy::Halt,
            on_stop_fault: StopFaultPolicy::Halt,
        }
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state, derived from the two flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconState {
    Uninitialized,
    StackReady,
    Advertising,
}

pub struct BeaconController<R, S, F> {
    radio: R,
    indicator: S,
    fatal: F,
    config: BeaconConfig,
    payload: BeaconPayload,
    adv_data: AdvData,
    params: Option<AdvertisingParams>,
    handle: Option<AdvHandle>,
    stack_ready: bool,
    advertising: bool,
}

impl<R, S, F> BeaconController<R, S, F>
where
    R: RadioStack,
    S: StatusIndicator,
    F: FatalErrorHandler,
{
    pub fn new(radio: R, indicator: S, fatal: F, config: BeaconConfig) -> Self {
        Self {
            radio,
            indicator,
            fatal,
            config,
            payload: BeaconPayload::new(),
            adv_data: AdvData::new(),
            params: None,
            handle: None,
            stack_ready: false,
            advertising: false,
        }
    }

    /// Bring the radio stack up. Only the first successful call reaches the
    /// stack; later calls return immediately.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.stack_ready {
            return Ok(());
        }

        if let Err(fault) = self.radio.enable() {
            return Err(self.fault(fault));
        }

        self.stack_ready = true;
        info!("Beacon: radio stack enabled");
        Ok(())
    }

    /// Restart advertising with a new interval and, if both values are
    /// given, new application data.
    ///
    /// Rejected with [`Error::NotInitialized`] before `init`.
    pub fn update(
        &mut self,
        interval_ms: u32,
        data1: Option<u16>,
        data2: Option<u16>,
    ) -> Result<(), Error> {
        if !self.stack_ready {
            warn!("Beacon: update rejected, radio stack not enabled");
            return Err(Error::NotInitialized);
        }

        self.halt_advertising().map_err(|f| self.fault(f))?;

        if self.payload.apply(data1, data2) {
            debug!(
                "Beacon: data1={=u16:#x} data2={=u16:#x}",
                self.payload.major,
                self.payload.minor
            );
        }

        let params = AdvertisingParams::beacon(interval_ms);
        adv_data::encode(&self.payload, self.config.company_id, &mut self.adv_data);

        let handle = self
            .radio
            .configure_advertisement(self.handle, &self.adv_data, &params)
            .map_err(|f| self.fault(f))?;
        self.handle = Some(handle);
        self.params = Some(params);

        self.radio
            .start_advertising(handle)
            .map_err(|f| self.fault(f))?;
        self.advertising = true;
        self.indicator.set(IndicatorState::Advertising);

        info!(
            "Beacon: advertising every {} ms ({} units)",
            interval_ms,
            params.interval
        );
        Ok(())
    }

    /// Stop advertising. A no-op when not advertising.
    pub fn stop(&mut self) -> Result<(), Error> {
        let fault = match self.halt_advertising() {
            Ok(()) => return Ok(()),
            Err(fault) => fault,
        };

        match self.config.on_stop_fault {
            StopFaultPolicy::Halt => {
                error!("Beacon: stop failed: {}", fault);
                self.fatal.on_fatal(fault);
                Err(fault.into())
            }
            StopFaultPolicy::Report => {
                warn!("Beacon: stop failed: {}", fault);
                Err(fault.into())
            }
            StopFaultPolicy::Ignore => {
                warn!("Beacon: ignoring stop failure: {}", fault);
                self.advertising = false;
                self.indicator.set(IndicatorState::Idle);
                Ok(())
            }
        }
    }

    /// Dispatch a control-loop command.
    pub fn handle(&mut self, cmd: BeaconCommand) -> Result<(), Error> {
        match cmd {
            BeaconCommand::Init => self.init(),
            BeaconCommand::Update {
                interval_ms,
                data1,
                data2,
            } => self.update(interval_ms, data1, data2),
            BeaconCommand::Stop => self.stop(),
        }
    }

    pub fn state(&self) -> BeaconState {
        if self.advertising {
            BeaconState::Advertising
        } else if self.stack_ready {
            BeaconState::StackReady
        } else {
            BeaconState::Uninitialized
        }
    }

    pub fn is_stack_ready(&self) -> bool {
        self.stack_ready
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    /// Parameters of the most recently configured advertising set.
    pub fn params(&self) -> Option<&AdvertisingParams> {
        self.params.as_ref()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn indicator(&self) -> &S {
        &self.indicator
    }

    pub fn fatal_handler(&self) -> &F {
        &self.fatal
    }

    /// Stop the broadcast if it is running. Shared by `update` and `stop`,
    /// which apply different fault policies to the result.
    fn halt_advertising(&mut self) -> Result<(), StackFault> {
        if !self.advertising {
            return Ok(());
        }
        if let Some(handle) = self.handle {
            self.radio.stop_advertising(handle)?;
        }
        self.advertising = false;
        self.indicator.set(IndicatorState::Idle);
        Ok(())
    }

    /// Apply `on_fault` to a stack failure from `init` / `update`.
    fn fault(&mut self, fault: StackFault) -> Error {
        match self.config.on_fault {
            FaultPolicy::Halt => {
                error!("Beacon: fatal stack fault: {}", fault);
                self.fatal.on_fatal(fault);
            }
            FaultPolicy::Report => {
                warn!("Beacon: stack fault: {}", fault);
            }
        }
        Error::Stack(fault)
    }
}
