//! Builder pattern for StepperController.

use embedded_hal::delay::DelayNs;

use crate::config::units::{StepMode, TimerTicks};
use crate::config::{validate_config, HomingConfig, StepperConfig};
use crate::error::{ConfigError, Error, Result};
use crate::hal::{Channel, CoilPort, CompareTimer, LimitSwitch};
use crate::motion::BusyFlag;

use super::controller::StepperController;
use super::homing::HomingProcedure;

/// Builder for creating StepperController instances.
pub struct StepperControllerBuilder<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    port: Option<PORT>,
    timer: Option<TIMER>,
    left: Option<LEFT>,
    right: Option<RIGHT>,
    delay: Option<DELAY>,
    busy: Option<&'a BusyFlag>,
    config: StepperConfig,
}

impl<'a, PORT, TIMER, LEFT, RIGHT, DELAY> Default
    for StepperControllerBuilder<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, PORT, TIMER, LEFT, RIGHT, DELAY> StepperControllerBuilder<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            port: None,
            timer: None,
            left: None,
            right: None,
            delay: None,
            busy: None,
            config: StepperConfig::default(),
        }
    }

    /// Set the coil port.
    pub fn port(mut self, port: PORT) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the step timer.
    pub fn timer(mut self, timer: TIMER) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the left (far-end) limit switch.
    pub fn left_switch(mut self, switch: LEFT) -> Self {
        self.left = Some(switch);
        self
    }

    /// Set the right (home) limit switch.
    pub fn right_switch(mut self, switch: RIGHT) -> Self {
        self.right = Some(switch);
        self
    }

    /// Set the homing delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the busy flag the controller reports through.
    pub fn busy_flag(mut self, busy: &'a BusyFlag) -> Self {
        self.busy = Some(busy);
        self
    }

    /// Set the controller name.
    pub fn name(mut self, name: &str) -> Self {
        if let Ok(name) = heapless::String::try_from(name) {
            self.config.name = name;
        }
        self
    }

    /// Set the timer ticks between steps.
    pub fn step_period(mut self, period: TimerTicks) -> Self {
        self.config.step_period = period;
        self
    }

    /// Set the step mode used after homing.
    pub fn step_mode(mut self, mode: StepMode) -> Self {
        self.config.step_mode = mode;
        self
    }

    /// Set the port bits wired to the coils.
    pub fn coil_mask(mut self, mask: u8) -> Self {
        self.config.coil_mask = mask;
        self
    }

    /// Set the timer channel pacing the steps.
    pub fn step_channel(mut self, channel: Channel) -> Self {
        self.config.step_channel = channel;
        self
    }

    /// Set the timer channels sharing pins with the coils.
    pub fn coil_channels(mut self, channels: [Channel; 4]) -> Self {
        self.config.coil_channels = channels;
        self
    }

    /// Set the homing parameters.
    pub fn homing(mut self, homing: HomingConfig) -> Self {
        self.config.homing = homing;
        self
    }

    /// Configure from a StepperConfig.
    pub fn from_config(mut self, config: &StepperConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Build the StepperController.
    ///
    /// # Errors
    ///
    /// Returns an error if a required part is missing or the configuration
    /// is invalid.
    pub fn build(self) -> Result<StepperController<'a, PORT, TIMER, LEFT, RIGHT, DELAY>> {
        validate_config(&self.config)?;

        let port = self.port.ok_or(Error::Config(ConfigError::MissingField("port")))?;
        let timer = self.timer.ok_or(Error::Config(ConfigError::MissingField("timer")))?;
        let left = self
            .left
            .ok_or(Error::Config(ConfigError::MissingField("left_switch")))?;
        let right = self
            .right
            .ok_or(Error::Config(ConfigError::MissingField("right_switch")))?;
        let delay = self.delay.ok_or(Error::Config(ConfigError::MissingField("delay")))?;
        let busy = self
            .busy
            .ok_or(Error::Config(ConfigError::MissingField("busy_flag")))?;

        let config = self.config;
        Ok(StepperController::new(
            port,
            timer,
            left,
            right,
            delay,
            busy,
            config.coil_mask,
            config.step_channel,
            config.coil_channels,
            config.step_period,
            config.step_mode,
            HomingProcedure::new(config.homing),
            config.name,
        ))
    }
}
