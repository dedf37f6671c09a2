//! Limit-switch homing.
//!
//! Runs once, blocking, before the step interrupt is ever enabled:
//!
//! 1. Step toward the right switch until it reads pressed. That position is
//!    home (zero).
//! 2. Reverse and step until the left switch reads pressed. The position
//!    reached is the travel range.
//!
//! The procedure does not own any hardware. Stepping, switch reads and the
//! settle delay are all passed in, so a simulated switch and a no-op delay
//! are enough to exercise it.

use embedded_hal::delay::DelayNs;

use crate::config::HomingConfig;
use crate::error::{HomingError, Result};
use crate::hal::LimitSide;
use crate::motion::MotionState;

/// Outcome of a successful homing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingReport {
    /// Steps taken to reach the right (home) switch.
    pub home_steps: u32,
    /// Travel between the switches, in half-steps.
    pub max_steps: u32,
}

/// Two-switch travel calibration.
#[derive(Debug, Clone, Copy)]
pub struct HomingProcedure {
    settle_delay_ms: u32,
    step_limit: Option<u32>,
}

impl HomingProcedure {
    /// Create from homing configuration.
    pub fn new(config: HomingConfig) -> Self {
        Self {
            settle_delay_ms: config.settle_delay_ms,
            step_limit: config.step_limit,
        }
    }

    /// Settle time after each step.
    #[inline]
    pub fn settle_delay_ms(&self) -> u32 {
        self.settle_delay_ms
    }

    /// Per-switch step limit, if bounded.
    #[inline]
    pub fn step_limit(&self) -> Option<u32> {
        self.step_limit
    }

    /// Run both phases.
    ///
    /// Steps in the direction already held by `state`, which should point
    /// toward the right switch. On success the position is the left end of
    /// travel, the target is pinned to it, and `max_steps` is recorded.
    ///
    /// # Errors
    ///
    /// Propagates step and switch-read failures. With a step limit set,
    /// returns [`HomingError::SwitchNotFound`] when a switch does not assert
    /// in time; without one, a dead switch blocks forever.
    pub fn run<S, P, D>(
        &self,
        state: &mut MotionState,
        mut step: S,
        mut pressed: P,
        delay: &mut D,
    ) -> Result<HomingReport>
    where
        S: FnMut(i32) -> Result<()>,
        P: FnMut(LimitSide) -> Result<bool>,
        D: DelayNs,
    {
        let home_steps = self.seek(LimitSide::Right, state, &mut step, &mut pressed, delay)?;
        state.zero();
        log_info!("HOMING: right limit after {} steps", home_steps);

        state.reverse();
        self.seek(LimitSide::Left, state, &mut step, &mut pressed, delay)?;

        let max_steps = state.position().abs();
        state.set_max_steps(max_steps);
        state.hold();
        log_info!("HOMING: travel is {} steps", max_steps);

        Ok(HomingReport {
            home_steps,
            max_steps,
        })
    }

    /// Step until `side` reads pressed; returns the steps taken.
    fn seek<S, P, D>(
        &self,
        side: LimitSide,
        state: &mut MotionState,
        step: &mut S,
        pressed: &mut P,
        delay: &mut D,
    ) -> Result<u32>
    where
        S: FnMut(i32) -> Result<()>,
        P: FnMut(LimitSide) -> Result<bool>,
        D: DelayNs,
    {
        let mut steps = 0u32;
        while !pressed(side)? {
            if self.step_limit.is_some_and(|limit| steps >= limit) {
                log_warn!("HOMING: {} limit not found after {} steps", side, steps);
                return Err(HomingError::SwitchNotFound { switch: side, steps }.into());
            }

            let stride = state.direction();
            step(stride)?;
            state.record_step(stride);
            delay.delay_ms(self.settle_delay_ms);
            steps += 1;
        }
        Ok(steps)
    }
}
