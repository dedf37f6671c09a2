//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::StepperConfig;

/// Number of channels on the step timer.
const TIMER_CHANNELS: u8 = 8;

/// Validate a stepper configuration.
///
/// Checks:
/// - Step period is non-zero
/// - Coil mask selects four adjacent bits
/// - Timer channels exist
/// - Homing step limit, when set, is non-zero
pub fn validate_config(config: &StepperConfig) -> Result<()> {
    if config.step_period.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidPeriod(config.step_period.0)));
    }

    if config.coil_mask.count_ones() != 4
        || config.coil_mask >> config.coil_mask.trailing_zeros() != 0x0F
    {
        return Err(Error::Config(ConfigError::InvalidCoilMask(config.coil_mask)));
    }

    let channels = core::iter::once(&config.step_channel).chain(config.coil_channels.iter());
    for &channel in channels {
        if channel >= TIMER_CHANNELS {
            return Err(Error::Config(ConfigError::InvalidChannel(channel)));
        }
    }

    if let Some(limit) = config.homing.step_limit {
        if limit == 0 {
            return Err(Error::Config(ConfigError::InvalidStepLimit(limit)));
        }
    }

    Ok(())
}
