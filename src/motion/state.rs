//! Motion state shared between the foreground and the step interrupt.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::units::{StepMode, Steps, TimerTicks};

/// Angles are folded into `0..ANGLE_RANGE` degrees of travel.
pub const ANGLE_RANGE: i16 = 180;

/// Map an angle onto the calibrated travel.
///
/// The angle is folded with a truncating remainder, so negative inputs keep
/// their sign and land below home.
pub fn angle_to_target(angle: i16, max_steps: u32) -> Steps {
    let folded = angle % ANGLE_RANGE;
    let fraction = folded as f32 / ANGLE_RANGE as f32;
    Steps((fraction * max_steps as f32) as i32)
}

/// Motion-in-progress flag.
///
/// Readable from the foreground without a critical section.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Create a cleared flag.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether a motion is in progress.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Position, target and stepping parameters of the motor.
#[derive(Debug, Clone)]
pub struct MotionState {
    /// Current position in half-steps from home.
    current: Steps,
    /// Position the step interrupt is driving toward.
    target: Steps,
    /// Mode used to derive the stride of the next move.
    step_mode: StepMode,
    /// Signed stride applied per step.
    direction: i32,
    /// Timer ticks between steps.
    period: TimerTicks,
    /// Calibrated travel, known once homing succeeds.
    max_steps: Option<u32>,
}

impl MotionState {
    /// Fresh state at position zero, half-stepping toward the home switch.
    pub fn new(period: TimerTicks) -> Self {
        Self {
            current: Steps::ZERO,
            target: Steps::ZERO,
            step_mode: StepMode::Half,
            direction: -StepMode::Half.stride(),
            period,
            max_steps: None,
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Steps {
        self.current
    }

    /// Target position.
    #[inline]
    pub fn target(&self) -> Steps {
        self.target
    }

    /// Whether the position equals the target.
    #[inline]
    pub fn at_target(&self) -> bool {
        self.current == self.target
    }

    /// Step mode for the next move.
    #[inline]
    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Signed stride per step.
    #[inline]
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Timer ticks between steps.
    #[inline]
    pub fn period(&self) -> TimerTicks {
        self.period
    }

    /// Calibrated travel in half-steps.
    #[inline]
    pub fn max_steps(&self) -> Option<u32> {
        self.max_steps
    }

    /// Change the step mode. Takes effect on the next [`retarget`](Self::retarget).
    pub fn set_step_mode(&mut self, mode: StepMode) {
        self.step_mode = mode;
    }

    /// Change the inter-step period.
    pub fn set_period(&mut self, period: TimerTicks) {
        self.period = period;
    }

    /// Overwrite the stride.
    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction;
    }

    /// Flip the sign of the stride.
    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }

    /// Make the current position home.
    pub fn zero(&mut self) {
        self.current = Steps::ZERO;
    }

    /// Record the calibrated travel.
    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = Some(max_steps);
    }

    /// Stop wanting to move: the target becomes the current position.
    pub fn hold(&mut self) {
        self.target = self.current;
    }

    /// Set a new target and derive the stride toward it.
    ///
    /// Any forward distance gets the positive stride of the current step
    /// mode; anything else, including zero, gets the negative one.
    pub fn retarget(&mut self, target: Steps) {
        let stride = self.step_mode.stride();
        self.target = target;
        self.direction = if target - self.current > 0 { stride } else { -stride };
    }

    /// Stride for the next step, or `None` at the target.
    ///
    /// A full stride is shortened to one half-step when it would jump past
    /// the target.
    pub fn next_stride(&self) -> Option<i32> {
        let remaining = self.target - self.current;
        if remaining == 0 {
            None
        } else if remaining.unsigned_abs() < self.direction.unsigned_abs() {
            Some(remaining.signum())
        } else {
            Some(self.direction)
        }
    }

    /// Account for one step of `stride`.
    pub fn record_step(&mut self, stride: i32) {
        self.current = self.current + stride;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_angle_mapping() {
        assert_eq!(angle_to_target(90, 200), Steps(100));
        assert_eq!(angle_to_target(0, 200), Steps(0));
        assert_eq!(angle_to_target(45, 200), Steps(50));
    }

    #[test]
    fn test_angle_folding_keeps_sign() {
        assert_eq!(angle_to_target(270, 200), Steps(100));
        assert_eq!(angle_to_target(-90, 200), Steps(-100));
    }

    #[test]
    fn test_retarget_direction() {
        let mut state = MotionState::new(TimerTicks(5000));

        state.retarget(Steps(10));
        assert_eq!(state.direction(), 1);

        state.set_step_mode(StepMode::Full);
        state.retarget(Steps(-10));
        assert_eq!(state.direction(), -2);

        // Zero distance counts as backwards.
        state.retarget(Steps(0));
        assert_eq!(state.direction(), -2);
        assert_eq!(state.next_stride(), None);
    }

    #[test]
    fn test_step_mode_applies_on_next_retarget() {
        let mut state = MotionState::new(TimerTicks(5000));
        state.retarget(Steps(10));

        state.set_step_mode(StepMode::Full);
        assert_eq!(state.direction(), 1);

        state.retarget(Steps(20));
        assert_eq!(state.direction(), 2);
    }

    #[test]
    fn test_full_stride_shortened_near_target() {
        let mut state = MotionState::new(TimerTicks(5000));
        state.set_step_mode(StepMode::Full);
        state.retarget(Steps(3));

        assert_eq!(state.next_stride(), Some(2));
        state.record_step(2);
        assert_eq!(state.next_stride(), Some(1));
        state.record_step(1);
        assert!(state.at_target());
    }

    #[test]
    fn test_busy_flag() {
        let busy = BusyFlag::new();
        assert!(!busy.is_set());
        busy.set();
        assert!(busy.is_set());
        busy.clear();
        assert!(!busy.is_set());
    }

    proptest! {
        #[test]
        fn target_within_travel(angle in 0i16..180, max in 1u32..20_000) {
            let target = angle_to_target(angle, max);
            prop_assert!(target.value() >= 0);
            prop_assert!(target.value() as u32 <= max);
        }

        #[test]
        fn never_passes_target(
            start in -500i32..500,
            target in -500i32..500,
            full in any::<bool>(),
        ) {
            let mut state = MotionState::new(TimerTicks(5000));
            state.record_step(start);
            state.set_step_mode(if full { StepMode::Full } else { StepMode::Half });
            state.retarget(Steps(target));

            let sign = (target - start).signum();
            while let Some(stride) = state.next_stride() {
                state.record_step(stride);
                let remaining = target - state.position().value();
                prop_assert!(remaining == 0 || remaining.signum() == sign);
            }
            prop_assert_eq!(state.position(), Steps(target));
        }
    }
}
