//! Controller shared between foreground code and the step interrupt.
//!
//! The controller sits in a `critical_section::Mutex`, so every access from
//! either side runs with interrupts masked. A foreground write can never be
//! split by a step tick, and a tick never sees half of a retarget.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::config::units::{StepMode, Steps, TimerTicks};
use crate::error::{MotorError, Result};
use crate::hal::{CoilPort, CompareTimer, LimitSwitch};
use crate::motion::TimerAction;

use super::controller::StepperController;

/// Slot for a controller reachable from an interrupt vector.
///
/// ```rust,ignore
/// static BUSY: BusyFlag = BusyFlag::new();
/// static STEPPER: SharedStepper<Board> = SharedStepper::new();
///
/// let mut stepper = StepperControllerBuilder::new()
///     /* ... */
///     .busy_flag(&BUSY)
///     .build()?;
/// stepper.init()?; // homing blocks; run it before sharing
/// STEPPER.install(stepper);
///
/// STEPPER.set_angle(90)?;
/// while BUSY.is_set() {}
///
/// #[interrupt]
/// fn TIMER_CH4() {
///     let _ = STEPPER.on_timer_interrupt();
/// }
/// ```
pub struct SharedStepper<C> {
    inner: Mutex<RefCell<Option<C>>>,
}

impl<C> Default for SharedStepper<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SharedStepper<C> {
    /// Empty slot.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put a controller in the slot, returning the previous one.
    pub fn install(&self, controller: C) -> Option<C> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(controller))
    }

    /// Take the controller out of the slot.
    pub fn take(&self) -> Option<C> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Whether a controller is installed.
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Run `f` on the controller inside a critical section.
    ///
    /// Returns `None` when the slot is empty.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<'a, PORT, TIMER, LEFT, RIGHT, DELAY>
    SharedStepper<StepperController<'a, PORT, TIMER, LEFT, RIGHT, DELAY>>
where
    PORT: CoilPort,
    TIMER: CompareTimer,
    LEFT: LimitSwitch,
    RIGHT: LimitSwitch,
    DELAY: DelayNs,
{
    /// Start a move. See [`StepperController::set_angle`].
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::NotHomed`] when the slot is empty or the
    /// controller has not been homed.
    pub fn set_angle(&self, angle: i16) -> Result<Steps> {
        self.with(|c| c.set_angle(angle))
            .unwrap_or(Err(MotorError::NotHomed.into()))
    }

    /// Change the step mode of the next move.
    pub fn set_step_mode(&self, mode: StepMode) {
        self.with(|c| c.set_step_mode(mode));
    }

    /// Change the timer ticks between steps.
    pub fn set_period(&self, period: TimerTicks) {
        self.with(|c| c.set_period(period));
    }

    /// Current position, if a controller is installed.
    pub fn position(&self) -> Option<Steps> {
        self.with(|c| c.position())
    }

    /// Step interrupt entry point.
    ///
    /// Returns `None` if the interrupt fires with the slot empty.
    pub fn on_timer_interrupt(&self) -> Option<Result<TimerAction>> {
        self.with(|c| c.on_timer_interrupt())
    }
}
