//! Error types for coil-stepper.
//!
//! Provides unified error handling across configuration, motor control, and homing.

use core::fmt;

use crate::hal::LimitSide;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all coil-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
    /// Homing (travel calibration) error
    Homing(HomingError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Step period must be at least one timer tick
    InvalidPeriod(u16),
    /// Builder is missing a required part
    MissingField(&'static str),
    /// Coil mask must select four adjacent port bits
    InvalidCoilMask(u8),
    /// Timer channel outside the 8-channel range
    InvalidChannel(u8),
    /// Homing step limit must be at least one step
    InvalidStepLimit(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Coil port write failed
    PinError,
    /// A move was requested before the travel range was calibrated
    NotHomed,
}

/// Homing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// A limit switch did not assert within the configured step limit
    SwitchNotFound {
        /// Switch that was being searched for
        switch: LimitSide,
        /// Steps taken before giving up
        steps: u32,
    },
    /// Reading a limit switch failed
    SwitchReadFailed(LimitSide),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Homing(e) => write!(f, "Homing error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::InvalidPeriod(v) => write!(f, "Invalid step period: {}. Must be > 0 ticks", v),
            ConfigError::InvalidCoilMask(m) => {
                write!(f, "Invalid coil mask: {:#04x}. Must select 4 adjacent bits", m)
            }
            ConfigError::InvalidChannel(c) => write!(f, "Invalid timer channel: {}. Must be 0-7", c),
            ConfigError::InvalidStepLimit(v) => write!(f, "Invalid homing step limit: {}. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO port operation failed"),
            MotorError::NotHomed => write!(f, "Motor travel range not calibrated"),
        }
    }
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::SwitchNotFound { switch, steps } => {
                write!(f, "{} limit switch not reached after {} steps", switch, steps)
            }
            HomingError::SwitchReadFailed(switch) => {
                write!(f, "Failed to read {} limit switch", switch)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<HomingError> for Error {
    fn from(e: HomingError) -> Self {
        Error::Homing(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for HomingError {}
