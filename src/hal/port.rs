//! Coil output port.

use embedded_hal::digital::OutputPin;

/// An 8-bit output port driving the four motor coils.
pub trait CoilPort {
    /// Error raised by a failed port write.
    type Error: core::fmt::Debug;

    /// Make the bits in `mask` outputs.
    fn set_data_direction(&mut self, mask: u8) -> Result<(), Self::Error>;

    /// Write `pattern` into the bits selected by `mask`, leaving the others
    /// untouched: `port = (port & !mask) | (pattern & mask)`.
    fn force_output_bits(&mut self, mask: u8, pattern: u8) -> Result<(), Self::Error>;
}

/// Coil port made of four discrete output pins.
///
/// `pins[n]` carries port bit `first_bit + n`. The default wiring starts at
/// bit 4, matching the default `0xF0` coil mask.
pub struct PinCoilPort<P>
where
    P: OutputPin,
{
    pins: [P; 4],
    first_bit: u8,
}

impl<P> PinCoilPort<P>
where
    P: OutputPin,
{
    /// Wrap four coil pins carrying bits 4..=7, lowest bit first.
    pub fn new(pins: [P; 4]) -> Self {
        Self::at_bit(pins, 4)
    }

    /// Wrap four coil pins carrying bits `first_bit..first_bit + 4`.
    pub fn at_bit(pins: [P; 4], first_bit: u8) -> Self {
        Self {
            pins,
            first_bit: first_bit.min(4),
        }
    }

    /// Give the pins back.
    pub fn release(self) -> [P; 4] {
        self.pins
    }
}

impl<P> CoilPort for PinCoilPort<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn set_data_direction(&mut self, _mask: u8) -> Result<(), Self::Error> {
        // Pins are outputs by type.
        Ok(())
    }

    fn force_output_bits(&mut self, mask: u8, pattern: u8) -> Result<(), Self::Error> {
        for (n, pin) in self.pins.iter_mut().enumerate() {
            let bit = 1u8 << (self.first_bit + n as u8);
            if mask & bit == 0 {
                continue;
            }
            if pattern & bit != 0 {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}
