//! Motor module for coil-stepper.
//!
//! Provides the stepper controller, its builder, the homing procedure and the
//! interrupt-safe shared slot.

mod builder;
mod controller;
mod homing;
mod shared;

pub use builder::StepperControllerBuilder;
pub use controller::StepperController;
pub use homing::{HomingProcedure, HomingReport};
pub use shared::SharedStepper;
