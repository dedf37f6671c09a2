//! # coil-stepper
//!
//! Interrupt-paced 4-phase stepper control with limit-switch homing.
//!
//! ## Features
//!
//! - **Coil sequencing**: 8-entry half-step table, full or half stepping
//! - **Timer paced**: one step per output-compare match, re-armed from the
//!   previous compare value so interrupt latency does not drift the rate
//! - **Homing**: blocking two-switch scan that calibrates the travel range
//! - **Angle moves**: `set_angle` maps 0-179 degrees onto the calibrated travel
//!   and returns immediately
//! - **Interrupt-safe sharing**: controller behind a `critical_section` mutex,
//!   busy flag readable without one
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coil_stepper::{BusyFlag, StepperControllerBuilder};
//!
//! static BUSY: BusyFlag = BusyFlag::new();
//!
//! let mut stepper = StepperControllerBuilder::new()
//!     .port(coil_port)
//!     .timer(timer)
//!     .left_switch(left)
//!     .right_switch(right)
//!     .delay(delay)
//!     .busy_flag(&BUSY)
//!     .build()?;
//!
//! // Blocks until both limit switches have been found
//! let report = stepper.init()?;
//!
//! stepper.set_angle(90)?;
//! // ... step timer interrupt calls stepper.on_timer_interrupt() ...
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod logging;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, HomingConfig, StepperConfig};
pub use error::{Error, Result};
pub use hal::{ActiveLow, CoilPort, CompareTimer, LimitSide, LimitSwitch, OutputAction, PinCoilPort};
pub use motion::{BusyFlag, CoilSequencer, MotionState, StepInterruptHandler, TimerAction};
pub use motor::{HomingProcedure, HomingReport, SharedStepper, StepperController, StepperControllerBuilder};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{StepMode, Steps, TimerTicks};
