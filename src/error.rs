//! Unified error type for the beacon.
//!
//! Every variant is `Copy`, so a fault can be logged, handed to the fatal
//! handler and returned to the caller without cloning. `defmt::Format` is
//! derived behind the `defmt` feature.

/// Top-level error type returned by the beacon controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// `update` was called before the radio stack was brought up.
    NotInitialized,

    /// The radio stack rejected an operation.
    Stack(StackFault),
}

/// Radio stack operation that produced a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackOp {
    /// Enabling the stack.
    Enable,
    /// Encoding / storing the advertising set.
    Configure,
    /// Starting the broadcast.
    Start,
    /// Stopping the broadcast.
    Stop,
}

/// A failure reported by the radio stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StackFault {
    /// Which call failed.
    pub op: StackOp,
    /// Raw NRF / SoftDevice error code.
    pub code: u32,
}

impl StackFault {
    pub const fn new(op: StackOp, code: u32) -> Self {
        Self { op, code }
    }
}

impl From<StackFault> for Error {
    fn from(fault: StackFault) -> Self {
        Error::Stack(fault)
    }
}
