//! Unit tests for the beacon lifecycle.
//!
//! These tests run on the host (not embedded) and drive the controller
//! through recording test doubles for the radio, LED and fault handler.

use core::cell::Cell;

use heapless::Vec;

use super::adv_data::{AdvertisingParams, ENCODED_ADV_LEN};
use super::payload::APP_DATA_OFFSET;
use super::{
    AdvHandle, BeaconCommand, BeaconConfig, BeaconController, BeaconState, FatalErrorHandler,
    FaultPolicy, IndicatorState, RadioStack, StatusIndicator, StopFaultPolicy,
};
use crate::error::{Error, StackFault, StackOp};

/// NRF_ERROR_INVALID_STATE
const INVALID_STATE: u32 = 8;

/// Offset of the application data inside the encoded advertisement
/// (flags AD + manufacturer AD header + company id).
const ADV_APP_DATA: usize = 7 + APP_DATA_OFFSET;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Enable,
    Configure(Option<AdvHandle>),
    Start(AdvHandle),
    Stop(AdvHandle),
}

#[derive(Default)]
struct MockRadio {
    calls: Vec<Call, 32>,
    adv_data: Vec<u8, 31>,
    params: Option<AdvertisingParams>,
    fail_on: Cell<Option<StackOp>>,
}

impl MockRadio {
    fn check(&self, op: StackOp) -> Result<(), StackFault> {
        if self.fail_on.get() == Some(op) {
            Err(StackFault::new(op, INVALID_STATE))
        } else {
            Ok(())
        }
    }

    fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl RadioStack for MockRadio {
    fn enable(&mut self) -> Result<(), StackFault> {
        let _ = self.calls.push(Call::Enable);
        self.check(StackOp::Enable)
    }

    fn configure_advertisement(
        &mut self,
        handle: Option<AdvHandle>,
        adv_data: &[u8],
        params: &AdvertisingParams,
    ) -> Result<AdvHandle, StackFault> {
        let _ = self.calls.push(Call::Configure(handle));
        self.check(StackOp::Configure)?;
        self.adv_data.clear();
        let _ = self.adv_data.extend_from_slice(adv_data);
        self.params = Some(*params);
        Ok(handle.unwrap_or(AdvHandle(0)))
    }

    fn start_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault> {
        let _ = self.calls.push(Call::Start(handle));
        self.check(StackOp::Start)
    }

    fn stop_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault> {
        let _ = self.calls.push(Call::Stop(handle));
        self.check(StackOp::Stop)
    }
}

#[derive(Default)]
struct MockIndicator {
    history: Vec<IndicatorState, 32>,
}

impl MockIndicator {
    fn current(&self) -> Option<IndicatorState> {
        self.history.last().copied()
    }
}

impl StatusIndicator for MockIndicator {
    fn set(&mut self, state: IndicatorState) {
        let _ = self.history.push(state);
    }
}

#[derive(Default)]
struct FaultRecorder {
    faults: Vec<StackFault, 8>,
}

impl FatalErrorHandler for FaultRecorder {
    fn on_fatal(&mut self, fault: StackFault) {
        let _ = self.faults.push(fault);
    }
}

type TestController = BeaconController<MockRadio, MockIndicator, FaultRecorder>;

fn controller_with(config: BeaconConfig) -> TestController {
    BeaconController::new(
        MockRadio::default(),
        MockIndicator::default(),
        FaultRecorder::default(),
        config,
    )
}

fn controller() -> TestController {
    controller_with(BeaconConfig::default())
}

fn app_data(ctl: &TestController) -> [u8; 4] {
    let adv = &ctl.radio().adv_data;
    [
        adv[ADV_APP_DATA],
        adv[ADV_APP_DATA + 1],
        adv[ADV_APP_DATA + 2],
        adv[ADV_APP_DATA + 3],
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// Lifecycle Guards
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fresh_controller_is_uninitialized() {
    let ctl = controller();
    assert_eq!(ctl.state(), BeaconState::Uninitialized);
    assert!(!ctl.is_stack_ready());
    assert!(!ctl.is_advertising());
    assert!(ctl.params().is_none());
}

#[test]
fn update_before_init_is_rejected() {
    let mut ctl = controller();
    assert_eq!(ctl.update(50, None, None), Err(Error::NotInitialized));
    assert_eq!(
        ctl.update(100, Some(1), Some(2)),
        Err(Error::NotInitialized)
    );
    assert!(!ctl.is_advertising());
    assert!(ctl.radio().calls.is_empty());
    assert!(ctl.indicator().history.is_empty());
    assert!(ctl.params().is_none());
}

#[test]
fn stop_before_init_is_noop() {
    let mut ctl = controller();
    assert_eq!(ctl.stop(), Ok(()));
    assert!(ctl.radio().calls.is_empty());
    assert_eq!(ctl.state(), BeaconState::Uninitialized);
}

#[test]
fn init_enables_stack_exactly_once() {
    let mut ctl = controller();
    for _ in 0..3 {
        assert_eq!(ctl.init(), Ok(()));
    }
    assert_eq!(ctl.radio().count(Call::Enable), 1);
    assert_eq!(ctl.state(), BeaconState::StackReady);
}

#[test]
fn init_after_advertising_does_not_touch_stack() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    let calls_before = ctl.radio().calls.len();

    ctl.init().unwrap();
    assert_eq!(ctl.radio().calls.len(), calls_before);
    assert!(ctl.is_advertising());
}

// ═══════════════════════════════════════════════════════════════════════════
// Update
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn update_starts_advertising() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, Some(0x0102), Some(0x0304)).unwrap();

    assert_eq!(ctl.state(), BeaconState::Advertising);
    assert_eq!(ctl.indicator().current(), Some(IndicatorState::Advertising));
    assert_eq!(ctl.params().map(|p| p.interval), Some(160));
    assert_eq!(ctl.radio().params, ctl.params().copied());
    assert_eq!(ctl.radio().adv_data.len(), ENCODED_ADV_LEN);
    assert_eq!(app_data(&ctl), [0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn update_writes_both_values_big_endian() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, Some(0xDEAD), Some(0xBEEF)).unwrap();
    assert_eq!(app_data(&ctl), [0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn update_without_data_keeps_previous_values() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, Some(0x1122), Some(0x3344)).unwrap();
    ctl.update(250, None, None).unwrap();

    assert_eq!(app_data(&ctl), [0x11, 0x22, 0x33, 0x44]);
    assert_eq!(ctl.params().map(|p| p.interval), Some(400));
}

#[test]
fn update_with_single_value_keeps_previous_values() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, Some(0x1122), Some(0x3344)).unwrap();

    ctl.update(100, Some(0xFFFF), None).unwrap();
    assert_eq!(app_data(&ctl), [0x11, 0x22, 0x33, 0x44]);

    ctl.update(100, None, Some(0xFFFF)).unwrap();
    assert_eq!(app_data(&ctl), [0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn first_update_without_data_broadcasts_defaults() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    assert_eq!(app_data(&ctl), [0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn update_while_advertising_stops_first_and_reuses_handle() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.update(200, Some(1), Some(2)).unwrap();

    let h = AdvHandle(0);
    assert_eq!(
        ctl.radio().calls[..],
        [
            Call::Enable,
            Call::Configure(None),
            Call::Start(h),
            Call::Stop(h),
            Call::Configure(Some(h)),
            Call::Start(h),
        ]
    );
    assert_eq!(
        ctl.indicator().history[..],
        [
            IndicatorState::Advertising,
            IndicatorState::Idle,
            IndicatorState::Advertising,
        ]
    );
}

#[test]
fn custom_company_id_is_encoded() {
    let mut ctl = controller_with(BeaconConfig {
        company_id: 0xFFFF,
        ..BeaconConfig::default()
    });
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    assert_eq!(ctl.radio().adv_data[5..7], [0xFF, 0xFF]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Stop
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn stop_is_idempotent() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();

    assert_eq!(ctl.stop(), Ok(()));
    assert_eq!(ctl.stop(), Ok(()));

    assert_eq!(ctl.radio().count(Call::Stop(AdvHandle(0))), 1);
    assert_eq!(ctl.indicator().current(), Some(IndicatorState::Idle));
    assert_eq!(ctl.state(), BeaconState::StackReady);
    assert!(ctl.fatal_handler().faults.is_empty());
}

#[test]
fn stop_without_advertising_is_noop() {
    let mut ctl = controller();
    ctl.init().unwrap();
    assert_eq!(ctl.stop(), Ok(()));
    assert_eq!(ctl.radio().calls[..], [Call::Enable]);
    assert!(ctl.indicator().history.is_empty());
}

#[test]
fn stack_ready_survives_stop() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.stop().unwrap();
    assert!(ctl.is_stack_ready());
    assert_eq!(ctl.update(100, None, None), Ok(()));
}

// ═══════════════════════════════════════════════════════════════════════════
// Fault Policies
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn enable_failure_is_fatal_by_default() {
    let mut ctl = controller();
    ctl.radio().fail_on.set(Some(StackOp::Enable));

    let fault = StackFault::new(StackOp::Enable, INVALID_STATE);
    assert_eq!(ctl.init(), Err(Error::Stack(fault)));
    assert_eq!(ctl.fatal_handler().faults[..], [fault]);
    assert!(!ctl.is_stack_ready());
    assert_eq!(ctl.update(100, None, None), Err(Error::NotInitialized));
}

#[test]
fn enable_failure_reported_without_halting() {
    let mut ctl = controller_with(BeaconConfig {
        on_fault: FaultPolicy::Report,
        ..BeaconConfig::default()
    });
    ctl.radio().fail_on.set(Some(StackOp::Enable));

    assert!(matches!(ctl.init(), Err(Error::Stack(_))));
    assert!(ctl.fatal_handler().faults.is_empty());

    // A later attempt reaches the stack again.
    ctl.radio().fail_on.set(None);
    assert_eq!(ctl.init(), Ok(()));
    assert_eq!(ctl.radio().count(Call::Enable), 2);
}

#[test]
fn start_failure_leaves_beacon_idle() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Start));

    let fault = StackFault::new(StackOp::Start, INVALID_STATE);
    assert_eq!(ctl.update(100, None, None), Err(Error::Stack(fault)));
    assert_eq!(ctl.fatal_handler().faults[..], [fault]);
    assert!(!ctl.is_advertising());
    assert!(ctl.indicator().history.is_empty());
}

#[test]
fn configure_failure_reported_without_halting() {
    let mut ctl = controller_with(BeaconConfig {
        on_fault: FaultPolicy::Report,
        ..BeaconConfig::default()
    });
    ctl.init().unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Configure));

    assert_eq!(
        ctl.update(100, None, None),
        Err(Error::Stack(StackFault::new(StackOp::Configure, INVALID_STATE)))
    );
    assert!(ctl.fatal_handler().faults.is_empty());
    assert!(!ctl.is_advertising());
    assert_eq!(ctl.radio().count(Call::Start(AdvHandle(0))), 0);
}

#[test]
fn stop_failure_is_fatal_by_default() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Stop));

    let fault = StackFault::new(StackOp::Stop, INVALID_STATE);
    assert_eq!(ctl.stop(), Err(Error::Stack(fault)));
    assert_eq!(ctl.fatal_handler().faults[..], [fault]);
    assert!(ctl.is_advertising());
}

#[test]
fn stop_failure_reported() {
    let mut ctl = controller_with(BeaconConfig {
        on_stop_fault: StopFaultPolicy::Report,
        ..BeaconConfig::default()
    });
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Stop));

    assert!(matches!(ctl.stop(), Err(Error::Stack(_))));
    assert!(ctl.fatal_handler().faults.is_empty());
    assert!(ctl.is_advertising());
    assert_eq!(ctl.indicator().current(), Some(IndicatorState::Advertising));
}

#[test]
fn stop_failure_ignored() {
    let mut ctl = controller_with(BeaconConfig {
        on_stop_fault: StopFaultPolicy::Ignore,
        ..BeaconConfig::default()
    });
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Stop));

    assert_eq!(ctl.stop(), Ok(()));
    assert!(ctl.fatal_handler().faults.is_empty());
    assert!(!ctl.is_advertising());
    assert_eq!(ctl.indicator().current(), Some(IndicatorState::Idle));

    // Already stopped: no second stack call.
    assert_eq!(ctl.stop(), Ok(()));
    assert_eq!(ctl.radio().count(Call::Stop(AdvHandle(0))), 1);
}

#[test]
fn stop_inside_update_follows_update_policy() {
    let mut ctl = controller_with(BeaconConfig {
        on_fault: FaultPolicy::Report,
        on_stop_fault: StopFaultPolicy::Ignore,
        ..BeaconConfig::default()
    });
    ctl.init().unwrap();
    ctl.update(100, None, None).unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Stop));

    assert_eq!(
        ctl.update(200, Some(1), Some(2)),
        Err(Error::Stack(StackFault::new(StackOp::Stop, INVALID_STATE)))
    );
    assert!(ctl.fatal_handler().faults.is_empty());
    // Still on the old set; nothing was reconfigured.
    assert!(ctl.is_advertising());
    assert_eq!(ctl.radio().count(Call::Configure(Some(AdvHandle(0)))), 0);
}

#[test]
fn stop_inside_update_is_fatal_by_default() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.update(100, Some(1), Some(2)).unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Stop));

    let fault = StackFault::new(StackOp::Stop, INVALID_STATE);
    assert_eq!(ctl.update(200, Some(3), Some(4)), Err(Error::Stack(fault)));
    assert_eq!(ctl.fatal_handler().faults[..], [fault]);
    assert!(ctl.is_advertising());
    assert_eq!(ctl.indicator().current(), Some(IndicatorState::Advertising));
    // The set on air is untouched.
    assert_eq!(app_data(&ctl), [0x00, 0x01, 0x00, 0x02]);
    assert_eq!(ctl.params().map(|p| p.interval), Some(160));
}

#[test]
fn configure_failure_is_fatal_by_default() {
    let mut ctl = controller();
    ctl.init().unwrap();
    ctl.radio().fail_on.set(Some(StackOp::Configure));

    let fault = StackFault::new(StackOp::Configure, INVALID_STATE);
    assert_eq!(ctl.update(100, None, None), Err(Error::Stack(fault)));
    assert_eq!(ctl.fatal_handler().faults[..], [fault]);
    assert!(!ctl.is_advertising());
    assert!(ctl.params().is_none());
    assert_eq!(ctl.radio().count(Call::Start(AdvHandle(0))), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Command Dispatch
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn commands_drive_the_lifecycle() {
    let mut ctl = controller();

    assert_eq!(
        ctl.handle(BeaconCommand::Update {
            interval_ms: 100,
            data1: None,
            data2: None,
        }),
        Err(Error::NotInitialized)
    );

    ctl.handle(BeaconCommand::Init).unwrap();
    ctl.handle(BeaconCommand::Update {
        interval_ms: 100,
        data1: Some(0x0A0B),
        data2: Some(0x0C0D),
    })
    .unwrap();
    assert_eq!(ctl.state(), BeaconState::Advertising);
    assert_eq!(app_data(&ctl), [0x0A, 0x0B, 0x0C, 0x0D]);

    ctl.handle(BeaconCommand::Stop).unwrap();
    assert_eq!(ctl.state(), BeaconState::StackReady);
}
