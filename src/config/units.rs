//! Unit types for motor quantities.
//!
//! Keeps step counts, timer periods and step modes from being mixed up as
//! bare integers.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Motor position in half-steps, relative to the home switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Steps(pub i32);

impl Steps {
    /// Home position.
    pub const ZERO: Self = Self(0);

    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Get absolute value.
    #[inline]
    pub fn abs(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl Add<i32> for Steps {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub for Steps {
    type Output = i32;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

/// Timer ticks between two coil steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct TimerTicks(pub u16);

impl TimerTicks {
    /// Create a new TimerTicks value.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for TimerTicks {
    fn default() -> Self {
        Self(5000)
    }
}

/// Coil sequencing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Skip every other table entry: two coils energised per step.
    Full,
    /// Walk every table entry.
    #[default]
    Half,
}

impl StepMode {
    /// Table entries (and half-steps of position) covered by one step.
    #[inline]
    pub const fn stride(self) -> i32 {
        match self {
            StepMode::Full => 2,
            StepMode::Half => 1,
        }
    }
}
