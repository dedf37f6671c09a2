//! Step interrupt state machine.
//!
//! IDLE: channel interrupt disabled, busy clear.
//! STEPPING: channel interrupt enabled, busy set.
//!
//! [`StepInterruptHandler::start`] moves IDLE to STEPPING. Each timer match
//! then calls [`StepInterruptHandler::on_tick`], which steps once unless the
//! motor is already at its target. If the motor is at the target after that,
//! the channel is disarmed and the handler returns to IDLE; otherwise the
//! channel is re-armed.

use crate::config::units::TimerTicks;
use crate::error::Result;
use crate::hal::{Channel, CompareTimer};

use super::state::{BusyFlag, MotionState};

/// What the step interrupt did to its timer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Compare advanced by this many ticks; another tick will follow.
    Rearm(TimerTicks),
    /// Interrupt disabled; the motor is at its target.
    Disable,
}

/// Drives [`MotionState`] from a timer compare channel.
#[derive(Debug, Clone, Copy)]
pub struct StepInterruptHandler {
    channel: Channel,
}

impl StepInterruptHandler {
    /// Handler paced by `channel`.
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Channel whose compare interrupt runs the handler.
    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Arm the channel one period from now and enter STEPPING.
    ///
    /// Busy is raised before the interrupt is enabled so a first tick that
    /// finds the motor already at target still leaves busy clear.
    pub fn start<T: CompareTimer>(&self, state: &MotionState, timer: &mut T, busy: &BusyFlag) {
        timer.arm_after(self.channel, state.period());
        busy.set();
        timer.enable_interrupt(self.channel);
    }

    /// Disarm the channel and enter IDLE.
    pub fn stop<T: CompareTimer>(&self, timer: &mut T, busy: &BusyFlag) {
        // Reading the compare register clears a pending match.
        let _ = timer.read_compare(self.channel);
        timer.disable_interrupt(self.channel);
        busy.clear();
    }

    /// Handle one compare match.
    ///
    /// `step` moves the coils by the given stride. A tick that finds the
    /// motor already at its target does not step. A failing step stops the
    /// handler and hands the error back.
    pub fn on_tick<T, F>(
        &self,
        state: &mut MotionState,
        timer: &mut T,
        busy: &BusyFlag,
        mut step: F,
    ) -> Result<TimerAction>
    where
        T: CompareTimer,
        F: FnMut(i32) -> Result<()>,
    {
        if let Some(stride) = state.next_stride() {
            if let Err(e) = step(stride) {
                self.stop(timer, busy);
                return Err(e);
            }
            state.record_step(stride);
        }

        if state.at_target() {
            self.stop(timer, busy);
            return Ok(TimerAction::Disable);
        }

        let period = state.period();
        timer.advance_compare(self.channel, period);
        Ok(TimerAction::Rearm(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Steps;
    use crate::error::{Error, MotorError};
    use crate::hal::OutputAction;

    #[derive(Default)]
    struct TimerLog {
        compare: u16,
        counter: u16,
        enabled: bool,
        compare_reads: u32,
    }

    impl CompareTimer for TimerLog {
        fn configure_output_compare(&mut self, _channel: Channel) {}

        fn set_output_action(&mut self, _channel: Channel, _action: OutputAction) {}

        fn enable_interrupt(&mut self, _channel: Channel) {
            self.enabled = true;
        }

        fn disable_interrupt(&mut self, _channel: Channel) {
            self.enabled = false;
        }

        fn arm_after(&mut self, _channel: Channel, ticks: TimerTicks) {
            self.compare = self.counter.wrapping_add(ticks.0);
        }

        fn advance_compare(&mut self, _channel: Channel, ticks: TimerTicks) {
            self.compare = self.compare.wrapping_add(ticks.0);
        }

        fn read_compare(&mut self, _channel: Channel) -> u16 {
            self.compare_reads += 1;
            self.compare
        }
    }

    #[test]
    fn test_rearm_is_relative_to_compare() {
        let handler = StepInterruptHandler::new(4);
        let mut timer = TimerLog {
            counter: 100,
            ..TimerLog::default()
        };
        let busy = BusyFlag::new();
        let mut state = MotionState::new(TimerTicks(5000));
        state.set_max_steps(200);
        state.retarget(Steps(3));

        handler.start(&state, &mut timer, &busy);
        assert_eq!(timer.compare, 5100);
        assert!(timer.enabled);
        assert!(busy.is_set());

        // Interrupt latency moves the counter, not the schedule.
        timer.counter = 5180;
        let action = handler.on_tick(&mut state, &mut timer, &busy, |_| Ok(())).unwrap();
        assert_eq!(action, TimerAction::Rearm(TimerTicks(5000)));
        assert_eq!(timer.compare, 10100);
    }

    #[test]
    fn test_stops_at_target() {
        let handler = StepInterruptHandler::new(4);
        let mut timer = TimerLog::default();
        let busy = BusyFlag::new();
        let mut state = MotionState::new(TimerTicks(10));
        state.retarget(Steps(2));
        handler.start(&state, &mut timer, &busy);

        let mut strides = 0;
        let mut ticks = 0;
        while handler
            .on_tick(&mut state, &mut timer, &busy, |_| {
                strides += 1;
                Ok(())
            })
            .unwrap()
            != TimerAction::Disable
        {
            ticks += 1;
        }

        // Second step lands on the target and disarms in the same tick.
        assert_eq!(ticks, 1);
        assert_eq!(strides, 2);
        assert_eq!(state.position(), Steps(2));
        assert!(!timer.enabled);
        assert_eq!(timer.compare_reads, 1);
        assert!(!busy.is_set());
    }

    #[test]
    fn test_tick_at_target_does_not_step() {
        let handler = StepInterruptHandler::new(4);
        let mut timer = TimerLog::default();
        let busy = BusyFlag::new();
        let mut state = MotionState::new(TimerTicks(10));
        state.retarget(Steps(0));
        handler.start(&state, &mut timer, &busy);

        let action = handler
            .on_tick(&mut state, &mut timer, &busy, |_| panic!("no step expected"))
            .unwrap();

        assert_eq!(action, TimerAction::Disable);
        assert_eq!(state.position(), Steps(0));
        assert!(!busy.is_set());
    }

    #[test]
    fn test_step_failure_stops_handler() {
        let handler = StepInterruptHandler::new(4);
        let mut timer = TimerLog::default();
        let busy = BusyFlag::new();
        let mut state = MotionState::new(TimerTicks(10));
        state.retarget(Steps(5));
        handler.start(&state, &mut timer, &busy);

        let result = handler.on_tick(&mut state, &mut timer, &busy, |_| {
            Err(Error::Motor(MotorError::PinError))
        });

        assert_eq!(result, Err(Error::Motor(MotorError::PinError)));
        assert_eq!(state.position(), Steps(0));
        assert!(!timer.enabled);
        assert!(!busy.is_set());
    }
}
