//! Stepper configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{StepMode, TimerTicks};
use crate::hal::Channel;

/// Complete stepper configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StepperConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default = "default_name")]
    pub name: String<32>,

    /// Timer ticks between coil steps.
    #[serde(default, rename = "step_period_ticks")]
    pub step_period: TimerTicks,

    /// Step mode used for moves after homing.
    #[serde(default)]
    pub step_mode: StepMode,

    /// Port bits wired to the coils.
    #[serde(default = "default_coil_mask")]
    pub coil_mask: u8,

    /// Timer channel whose compare interrupt paces the steps.
    #[serde(default = "default_step_channel")]
    pub step_channel: Channel,

    /// Timer channels sharing pins with the coils.
    ///
    /// They are put in output-compare mode with no pin action so the port
    /// writes stay under software control.
    #[serde(default = "default_coil_channels")]
    pub coil_channels: [Channel; 4],

    /// Homing parameters.
    #[serde(default)]
    pub homing: HomingConfig,
}

/// Homing scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HomingConfig {
    /// Settle time after each homing step.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u32,

    /// Give up on a switch after this many steps. Unbounded when absent.
    #[serde(default)]
    pub step_limit: Option<u32>,
}

fn default_name() -> String<32> {
    String::try_from("stepper").unwrap_or_default()
}

fn default_coil_mask() -> u8 {
    0xF0
}

fn default_step_channel() -> Channel {
    4
}

fn default_coil_channels() -> [Channel; 4] {
    [4, 5, 6, 7]
}

fn default_settle_delay_ms() -> u32 {
    5
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            step_limit: None,
        }
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            step_period: TimerTicks::default(),
            step_mode: StepMode::default(),
            coil_mask: default_coil_mask(),
            step_channel: default_step_channel(),
            coil_channels: default_coil_channels(),
            homing: HomingConfig::default(),
        }
    }
}
