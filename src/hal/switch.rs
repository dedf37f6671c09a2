//! End-of-travel limit switches.

use core::fmt;

use embedded_hal::digital::InputPin;

/// Which end of travel a switch sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitSide {
    /// Far end; reached second during homing.
    Left,
    /// Home end; position zero.
    Right,
}

impl fmt::Display for LimitSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitSide::Left => write!(f, "left"),
            LimitSide::Right => write!(f, "right"),
        }
    }
}

/// A limit switch input.
pub trait LimitSwitch {
    /// Error raised by a failed read or reconfiguration.
    type Error: core::fmt::Debug;

    /// Switch the pin from analog to digital input mode.
    ///
    /// Pins whose mode is fixed by type need nothing here.
    fn set_digital(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether the switch is currently pressed.
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}

/// Switch wired to pull its input low when pressed.
pub struct ActiveLow<P>(P);

impl<P: InputPin> ActiveLow<P> {
    /// Wrap an input pin.
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.0
    }
}

impl<P: InputPin> LimitSwitch for ActiveLow<P> {
    type Error = P::Error;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}
