//! Output-compare timer channel contract.

use crate::config::units::TimerTicks;

/// Timer channel number (0-7).
pub type Channel = u8;

/// Pin action taken by the timer when a channel's compare matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputAction {
    /// Leave the pin alone; the pin stays under software control.
    None,
    /// Toggle the pin.
    Toggle,
    /// Drive the pin low.
    Clear,
    /// Drive the pin high.
    Set,
}

/// A free-running timer with output-compare channels.
///
/// Register writes on a timer cannot fail, so none of these methods return
/// a `Result`.
pub trait CompareTimer {
    /// Put `channel` in output-compare mode.
    fn configure_output_compare(&mut self, channel: Channel);

    /// Select what the channel does to its pin on a compare match.
    fn set_output_action(&mut self, channel: Channel, action: OutputAction);

    /// Enable the compare interrupt of `channel`.
    fn enable_interrupt(&mut self, channel: Channel);

    /// Disable the compare interrupt of `channel`.
    fn disable_interrupt(&mut self, channel: Channel);

    /// Set the compare value to the current counter plus `ticks`.
    fn arm_after(&mut self, channel: Channel, ticks: TimerTicks);

    /// Add `ticks` to the channel's current compare value.
    ///
    /// Used for re-arming from the interrupt so the period is measured from
    /// the previous match rather than from interrupt entry.
    fn advance_compare(&mut self, channel: Channel, ticks: TimerTicks);

    /// Read the compare register, clearing a pending match flag.
    fn read_compare(&mut self, channel: Channel) -> u16;
}
