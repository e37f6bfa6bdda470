//! Status LED driven from the beacon lifecycle.
//!
//! Lit while advertising, dark while idle. Works with any `embedded-hal`
//! output pin; GPIO errors are dropped since the indicator is best effort.

use embedded_hal::digital::OutputPin;

use crate::beacon::{IndicatorState, StatusIndicator};

pub struct LedIndicator<P> {
    pin: P,
    active_low: bool,
    state: IndicatorState,
}

impl<P: OutputPin> LedIndicator<P> {
    /// Wrap `pin` and switch the LED off.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            state: IndicatorState::Idle,
        };
        led.drive(false);
        led
    }

    /// Last state shown.
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    fn drive(&mut self, lit: bool) {
        let _ = if lit != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

impl<P: OutputPin> StatusIndicator for LedIndicator<P> {
    fn set(&mut self, state: IndicatorState) {
        self.drive(state == IndicatorState::Advertising);
        self.state = state;
    }
}
