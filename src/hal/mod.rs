//! Hardware seams for coil-stepper.
//!
//! The controller never touches registers directly. A board crate implements
//! these traits for its timer and ports; the pin adapters cover the common case
//! of four `embedded-hal` output pins and two `embedded-hal` input switches.

mod port;
mod switch;
mod timer;

pub use port::{CoilPort, PinCoilPort};
pub use switch::{ActiveLow, LimitSide, LimitSwitch};
pub use timer::{Channel, CompareTimer, OutputAction};
