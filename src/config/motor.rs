//! Motor configuration from TOML.

use core::time::Duration;

use embedded_hal::digital::PinState;
use heapless::String;
use serde::Deserialize;

use super::units::Degrees;
use crate::error::Result;
use crate::motion;

/// Logic level that enables the driver on the EN line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ActiveLevel {
    /// Driver enabled while EN is low (DRV8825, A4988).
    #[default]
    Low,
    /// Driver enabled while EN is high.
    High,
}

impl ActiveLevel {
    /// Pin state that enables the driver.
    #[inline]
    pub fn active(self) -> PinState {
        match self {
            ActiveLevel::Low => PinState::Low,
            ActiveLevel::High => PinState::High,
        }
    }

    /// Pin state that disables the driver.
    #[inline]
    pub fn inactive(self) -> PinState {
        !self.active()
    }
}

/// Complete motor configuration from TOML.
///
/// Every field has a default. Nonsensical timing values (zero steps, zero
/// microstepping, non-positive speed) are accepted here and rejected when
/// the first pulse is timed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Base steps per revolution (200 for common 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstepping multiplier set on the driver hardware.
    pub microstepping: u16,

    /// Level on EN that enables the driver.
    pub enable_level: ActiveLevel,

    /// Invert direction pin logic.
    pub invert_direction: bool,

    /// Target speed in revolutions per minute.
    #[serde(rename = "speed_rpm")]
    pub speed: f32,

    /// Poll the endstops after every step of a plain move and abort when one closes.
    pub check_endstops_while_moving: bool,

    /// Software end of travel, used when there is no max endstop.
    #[serde(rename = "max_position_degrees")]
    pub max_position: Option<Degrees>,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            name: String::try_from("StepperMotor").unwrap_or_default(),
            steps_per_revolution: 200,
            microstepping: 1,
            enable_level: ActiveLevel::Low,
            invert_direction: false,
            speed: 30.0,
            check_endstops_while_moving: true,
            max_position: None,
        }
    }
}

impl MotorConfig {
    /// Calculate microsteps per shaft revolution.
    pub fn microsteps_per_revolution(&self) -> u32 {
        u32::from(self.steps_per_revolution) * u32::from(self.microstepping)
    }

    /// Angular resolution of a single microstep.
    pub fn degrees_per_microstep(&self) -> Degrees {
        motion::angle_for_microsteps(1, self.steps_per_revolution, self.microstepping)
    }

    /// Half-period of one step pulse at the configured speed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) if microstepping,
    /// steps per revolution or speed is out of range.
    pub fn step_interval(&self) -> Result<Duration> {
        motion::half_period(self.steps_per_revolution, self.microstepping, self.speed)
    }

    /// Whole microsteps needed for `angle` (sign ignored, truncated).
    pub fn microsteps_for(&self, angle: Degrees) -> u32 {
        motion::microsteps_for_angle(angle, self.steps_per_revolution, self.microstepping)
    }

    /// Angle covered by `steps` microsteps.
    pub fn angle_for(&self, steps: u32) -> Degrees {
        motion::angle_for_microsteps(steps, self.steps_per_revolution, self.microstepping)
    }
}
