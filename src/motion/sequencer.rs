//! Coil pattern sequencing.

use crate::hal::CoilPort;

/// Number of entries in the coil table.
pub const COIL_TABLE_LEN: usize = 8;

/// Half-step coil patterns, one nibble per entry, coil A on the top bit.
///
/// Even entries energise one coil, odd entries two. Walking the table one
/// entry at a time half-steps the rotor; two at a time full-steps it.
pub const COIL_TABLE: [u8; COIL_TABLE_LEN] = [0x8, 0xA, 0x2, 0x6, 0x4, 0x5, 0x1, 0x9];

/// Walks the coil table and writes the current entry to the coil port.
#[derive(Debug, Clone, Copy)]
pub struct CoilSequencer {
    /// Current table entry.
    index: usize,
    /// Port bits wired to the coils.
    mask: u8,
    /// Shift from a table nibble to the masked port bits.
    shift: u32,
}

impl CoilSequencer {
    /// Create a sequencer at table entry 0 for the four adjacent bits in `mask`.
    pub const fn new(mask: u8) -> Self {
        let shift = if mask == 0 { 0 } else { mask.trailing_zeros() };
        Self {
            index: 0,
            mask,
            shift,
        }
    }

    /// Current table entry.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Port bits driven by the sequencer.
    #[inline]
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Current entry, shifted into the coil bits of the port.
    #[inline]
    pub fn pattern(&self) -> u8 {
        (COIL_TABLE[self.index] << self.shift) & self.mask
    }

    /// Move `stride` entries through the table, wrapping at either end.
    pub fn advance(&mut self, stride: i32) {
        let len = COIL_TABLE_LEN as i32;
        self.index = (self.index as i32 + stride).rem_euclid(len) as usize;
    }

    /// Write the current entry to the coil bits of `port`.
    pub fn apply<P: CoilPort>(&self, port: &mut P) -> Result<(), P::Error> {
        port.force_output_bits(self.mask, self.pattern())
    }
}
