//! Motion module for coil-stepper.
//!
//! Coil sequencing, the shared motion state, and the timer-tick handler that
//! advances it.

mod handler;
mod sequencer;
mod state;

pub use handler::{StepInterruptHandler, TimerAction};
pub use sequencer::{CoilSequencer, COIL_TABLE, COIL_TABLE_LEN};
pub use state::{angle_to_target, BusyFlag, MotionState, ANGLE_RANGE};
