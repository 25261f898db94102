//! Step pulse timing.
//!
//! A step pulse is a low phase followed by a high phase, each held for one
//! half-period, so a full microstep takes twice [`half_period`].

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::config::units::Degrees;
use crate::error::{ConfigError, Result};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Compute the half-period of one step pulse.
///
/// `microsteps_per_sec = steps_per_revolution * microstepping * speed_rpm / 60`,
/// and the half-period is `1s / microsteps_per_sec / 2`, truncated to whole
/// nanoseconds.
///
/// # Errors
///
/// Checked in order: microstepping, steps per revolution, speed.
pub fn half_period(steps_per_revolution: u16, microstepping: u16, speed_rpm: f32) -> Result<Duration> {
    if microstepping < 1 {
        return Err(ConfigError::IncorrectMicrostepping(microstepping).into());
    }
    if steps_per_revolution < 1 {
        return Err(ConfigError::IncorrectStepsPerRevolution(steps_per_revolution).into());
    }
    // Also rejects NaN
    if !(speed_rpm > 0.0) {
        return Err(ConfigError::IncorrectSpeed(speed_rpm).into());
    }

    let microsteps_per_revolution = u32::from(steps_per_revolution) * u32::from(microstepping);
    let microsteps_per_sec = f64::from(microsteps_per_revolution) * f64::from(speed_rpm) / 60.0;
    let nanos = NANOS_PER_SEC / microsteps_per_sec / 2.0;

    Ok(Duration::from_nanos(nanos as u64))
}

/// Number of whole microsteps needed to cover `angle`, truncated toward zero.
///
/// Sign is ignored; returns 0 for degenerate configurations.
pub fn microsteps_for_angle(angle: Degrees, steps_per_revolution: u16, microstepping: u16) -> u32 {
    let steps = angle.abs().value() * f64::from(steps_per_revolution) * f64::from(microstepping) / 360.0;
    // `as` saturates and maps NaN to 0
    steps as u32
}

/// Angle covered by `steps` microsteps (always non-negative).
pub fn angle_for_microsteps(steps: u32, steps_per_revolution: u16, microstepping: u16) -> Degrees {
    if steps == 0 {
        return Degrees::ZERO;
    }
    Degrees(
        f64::from(steps) * 360.0 / f64::from(steps_per_revolution) / f64::from(microstepping),
    )
}

/// Block on `delay` for `period`.
///
/// `DelayNs` takes `u32` nanoseconds, so periods above ~4.29 s are split.
pub fn sleep_for<D: DelayNs>(delay: &mut D, period: Duration) {
    let mut nanos = period.as_nanos();
    while nanos > u128::from(u32::MAX) {
        delay.delay_ms(1_000);
        nanos -= 1_000_000_000;
    }
    if nanos > 0 {
        delay.delay_ns(nanos as u32);
    }
}
