//! Configuration module for coil-stepper.
//!
//! Provides types for loading and validating the stepper configuration
//! from TOML files (with `std` feature) or building it in code.

mod stepper;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use stepper::{HomingConfig, StepperConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{StepMode, Steps, TimerTicks};
