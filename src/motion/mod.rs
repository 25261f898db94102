//! Motion module for stepper-homing.
//!
//! Provides step timing derived from speed and microstepping, and the
//! angle/step conversions used by relative moves.

mod direction;
mod timing;

pub use direction::Direction;
pub use timing::{angle_for_microsteps, half_period, microsteps_for_angle, sleep_for};
