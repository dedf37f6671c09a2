//! Stepper controller.
//!
//! Owns the board hardware and the motion state, and exposes the foreground
//! API (`init`, `set_angle`, `set_step_mode`, `set_period`, `is_busy`) plus
//! the timer interrupt entry point.

use embedded_hal::delay::DelayNs;

use crate::config::units::{StepMode, Steps, TimerTicks};
use crate::error::{Error, HomingError, MotorError, Result};
use crate::hal::{Channel, CoilPort, CompareTimer, LimitSide, LimitSwitch, OutputAction};
use crate::motion::{
    angle_to_target, BusyFlag, CoilSequencer, MotionState, StepInterruptHandler, TimerAction,
};

use super::homing::{HomingProcedure, HomingReport};

/// Interrupt-paced stepper with limit-switch homing.
///
/// Generic over:
/// - `PORT`: coil output port (must implement [`CoilPort`])
/// - `TIMER`: step timer (must implement [`CompareTimer`])
/// - `LEFT`, `RIGHT`: limit switches (must implement [`LimitSwitch`])
/// - `DELAY`: homing settle delay (must implement `DelayNs`)
///
/// Created through [`StepperControllerBuilder`](super::StepperControllerBuilder).
pub struct StepperController<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    /// Coil output port.
    port: PORT,

    /// Step timer.
    timer: TIMER,

    /// Far-end switch.
    left: LEFT,

    /// Home switch.
    right: RIGHT,

    /// Delay used between homing steps.
    delay: DELAY,

    /// Coil table walker.
    sequencer: CoilSequencer,

    /// Position, target and stepping parameters.
    state: MotionState,

    /// Motion-in-progress flag, shared with foreground pollers.
    busy: &'a BusyFlag,

    /// Timer-tick state machine.
    handler: StepInterruptHandler,

    /// Travel calibration.
    homing: HomingProcedure,

    /// Timer channels sharing pins with the coils.
    coil_channels: [Channel; 4],

    /// Step mode for moves once homing is done.
    run_mode: StepMode,

    /// Controller name for logging/debugging.
    name: heapless::String<32>,
}

impl<'a, PORT, TIMER, LEFT, RIGHT, DELAY> StepperController<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        port: PORT,
        timer: TIMER,
        left: LEFT,
        right: RIGHT,
        delay: DELAY,
        busy: &'a BusyFlag,
        coil_mask: u8,
        step_channel: Channel,
        coil_channels: [Channel; 4],
        period: TimerTicks,
        run_mode: StepMode,
        homing: HomingProcedure,
        name: heapless::String<32>,
    ) -> Self {
        Self {
            port,
            timer,
            left,
            right,
            delay,
            sequencer: CoilSequencer::new(coil_mask),
            state: MotionState::new(period),
            busy,
            handler: StepInterruptHandler::new(step_channel),
            homing,
            coil_channels,
            run_mode,
            name,
        }
    }

    /// Get the controller name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Configure the hardware and calibrate travel. Blocks until homing ends.
    ///
    /// The step interrupt is left disabled; the first [`set_angle`](Self::set_angle)
    /// enables it.
    ///
    /// # Errors
    ///
    /// Returns an error if a port write or switch read fails, or if a switch
    /// is not found within the configured homing step limit.
    pub fn init(&mut self) -> Result<HomingReport> {
        for &channel in self.coil_channels.iter() {
            self.timer.configure_output_compare(channel);
            self.timer.set_output_action(channel, OutputAction::None);
        }
        self.port
            .set_data_direction(self.sequencer.mask())
            .map_err(|_| MotorError::PinError)?;

        self.left
            .set_digital()
            .map_err(|_| HomingError::SwitchReadFailed(LimitSide::Left))?;
        self.right
            .set_digital()
            .map_err(|_| HomingError::SwitchReadFailed(LimitSide::Right))?;

        self.state.set_step_mode(StepMode::Half);
        self.state.set_direction(-StepMode::Half.stride());

        log_info!("STEPPER: homing");
        let Self {
            port,
            left,
            right,
            delay,
            sequencer,
            state,
            homing,
            ..
        } = self;

        let report = homing.run(
            state,
            |stride| coil_step(sequencer, port, stride),
            |side| match side {
                LimitSide::Left => left
                    .is_pressed()
                    .map_err(|_| Error::Homing(HomingError::SwitchReadFailed(side))),
                LimitSide::Right => right
                    .is_pressed()
                    .map_err(|_| Error::Homing(HomingError::SwitchReadFailed(side))),
            },
            delay,
        )?;

        self.state.set_step_mode(self.run_mode);
        Ok(report)
    }

    /// Start a move to `angle` degrees of the calibrated travel.
    ///
    /// The angle is folded with `angle % 180`. A move already in progress is
    /// abandoned for the new one. Returns immediately with the new target;
    /// poll [`is_busy`](Self::is_busy) for completion.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::NotHomed`] before a successful [`init`](Self::init).
    pub fn set_angle(&mut self, angle: i16) -> Result<Steps> {
        let max_steps = self.state.max_steps().ok_or(MotorError::NotHomed)?;
        let target = angle_to_target(angle, max_steps);

        self.state.retarget(target);
        self.handler.start(&self.state, &mut self.timer, self.busy);
        log_debug!("STEPPER: target {} from {}", target, self.state.position());

        Ok(target)
    }

    /// Change the step mode used by the next [`set_angle`](Self::set_angle).
    pub fn set_step_mode(&mut self, mode: StepMode) {
        self.run_mode = mode;
        self.state.set_step_mode(mode);
    }

    /// Change the timer ticks between steps, from the next re-arm on.
    pub fn set_period(&mut self, period: TimerTicks) {
        self.state.set_period(period);
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Shared busy flag, for polling without access to the controller.
    #[inline]
    pub fn busy_flag(&self) -> &'a BusyFlag {
        self.busy
    }

    /// Run one step-timer match. Call from the step channel's interrupt.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::PinError`] if the coil write fails; the
    /// interrupt is disabled and busy cleared before returning.
    pub fn on_timer_interrupt(&mut self) -> Result<TimerAction> {
        let Self {
            port,
            timer,
            sequencer,
            state,
            busy,
            handler,
            ..
        } = self;

        handler.on_tick(state, timer, *busy, |stride| coil_step(sequencer, port, stride))
    }

    /// Current position in half-steps from home.
    #[inline]
    pub fn position(&self) -> Steps {
        self.state.position()
    }

    /// Target of the current (or last) move.
    #[inline]
    pub fn target(&self) -> Steps {
        self.state.target()
    }

    /// Calibrated travel, once homed.
    #[inline]
    pub fn max_steps(&self) -> Option<u32> {
        self.state.max_steps()
    }

    /// Whether homing has completed.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.state.max_steps().is_some()
    }

    /// Step mode of the next move.
    #[inline]
    pub fn step_mode(&self) -> StepMode {
        self.state.step_mode()
    }

    /// Signed stride of the current move.
    #[inline]
    pub fn direction(&self) -> i32 {
        self.state.direction()
    }

    /// Timer ticks between steps.
    #[inline]
    pub fn period(&self) -> TimerTicks {
        self.state.period()
    }

    /// Current coil table entry.
    #[inline]
    pub fn coil_index(&self) -> usize {
        self.sequencer.index()
    }

    /// Get the motion state.
    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Give back the hardware.
    pub fn release(self) -> (PORT, TIMER, LEFT, RIGHT, DELAY) {
        (self.port, self.timer, self.left, self.right, self.delay)
    }
}

/// Advance the coil table by `stride` and write the new entry.
///
/// The table index only moves once the write has succeeded.
fn coil_step<P: CoilPort>(sequencer: &mut CoilSequencer, port: &mut P, stride: i32) -> Result<()> {
    let mut next = *sequencer;
    next.advance(stride);
    next.apply(port)
        .map_err(|_| Error::Motor(MotorError::PinError))?;
    *sequencer = next;
    Ok(())
}
