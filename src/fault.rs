//! Fatal radio faults: log, then reset the chip.
//!
//! The SoftDevice cannot be recovered once it reports an error here, so a
//! reset is the only way back to a working beacon.

use defmt::error;
use xm122_beacon::beacon::FatalErrorHandler;
use xm122_beacon::StackFault;

pub struct ResetOnFault;

impl FatalErrorHandler for ResetOnFault {
    fn on_fatal(&mut self, fault: StackFault) {
        error!("Fatal radio fault {} - resetting", fault);
        cortex_m::peripheral::SCB::sys_reset();
    }
}
