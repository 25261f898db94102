//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types. Drives the EN, DIR and STEP lines
//! of a hardware driver (DRV8825, A4988, ...) and consults optional endstops.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Degrees;
use crate::config::MotorConfig;
use crate::endstop::{EndDetection, EndDetector, NoEndstop};
use crate::error::{Error, MotorError, Result};
use crate::motion::{self, Direction};

use super::builder::StepperMotorBuilder;
use super::command::Command;
use super::state::{MotionState, PowerState};

/// Outcome of a step loop: completed steps, or completed steps and the error
/// that stopped the loop.
pub type StepResult = core::result::Result<u32, (u32, Error)>;

/// Stepper motor driver.
///
/// Generic over:
/// - `EN`: EN pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
/// - `ES`: Endstop type for both ends (must implement `EndDetector`)
///
/// All motion calls block until the motion is over. Nothing stops motion
/// commands while the driver is disabled; the pulses are simply ignored by
/// the hardware.
pub struct StepperMotor<EN, DIR, STEP, DELAY, ES = NoEndstop>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    /// EN pin (driver power).
    enable_pin: EN,

    /// DIR pin (high = CW, low = CCW, or inverted).
    dir_pin: DIR,

    /// STEP pin (one low/high cycle per microstep).
    step_pin: STEP,

    /// Delay provider for step timing.
    delay: DELAY,

    /// Caller-adjustable configuration.
    config: MotorConfig,

    /// Position, power, calibration and pending errors.
    state: MotionState,

    /// Min/max endstops.
    endstops: EndDetection<ES>,
}

impl<EN, DIR, STEP, DELAY, ES> StepperMotor<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    /// Create a new, disabled and uncalibrated motor.
    pub(crate) fn new(
        enable_pin: EN,
        dir_pin: DIR,
        step_pin: STEP,
        delay: DELAY,
        config: MotorConfig,
    ) -> Self {
        let state = MotionState::with_max_position(config.max_position.unwrap_or(Degrees::ZERO));

        Self {
            enable_pin,
            dir_pin,
            step_pin,
            delay,
            config,
            state,
            endstops: EndDetection::default(),
        }
    }

    /// Start building a motor.
    pub fn builder() -> StepperMotorBuilder<EN, DIR, STEP, DELAY, ES> {
        StepperMotorBuilder::new()
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.config.name.as_str()
    }

    /// Rename the motor (truncated to 32 bytes).
    pub fn set_name(&mut self, name: &str) {
        self.config.name.clear();
        for c in name.chars() {
            if self.config.name.push(c).is_err() {
                break;
            }
        }
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Changes apply from the next motion call. Invalid timing values are
    /// reported by that call. `max_position` is only read when the motor is
    /// built; use [`set_max_position`](Self::set_max_position) afterwards.
    #[inline]
    pub fn config_mut(&mut self) -> &mut MotorConfig {
        &mut self.config
    }

    /// Get current position in degrees.
    #[inline]
    pub fn position(&self) -> Degrees {
        self.state.position
    }

    /// Overwrite the position estimate.
    #[inline]
    pub fn set_position(&mut self, position: Degrees) {
        self.state.position = position;
    }

    /// Whether a seek to min has succeeded.
    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.state.calibrated
    }

    /// Software end of travel (zero when undefined).
    #[inline]
    pub fn max_position(&self) -> Degrees {
        self.state.max_position
    }

    /// Set the software end of travel. Zero leaves it undefined.
    ///
    /// A later [`seek_max`](Self::seek_max) against a max endstop overwrites it.
    #[inline]
    pub fn set_max_position(&mut self, max_position: Degrees) {
        self.state.max_position = max_position;
    }

    /// Current driver power state.
    #[inline]
    pub fn power_state(&self) -> PowerState {
        self.state.power
    }

    /// Number of errors waiting in the pending queue.
    #[inline]
    pub fn pending_error_count(&self) -> usize {
        self.state.pending_error_count()
    }

    /// Power the driver stage.
    ///
    /// The state is only updated if the EN write succeeds.
    pub fn enable(&mut self) -> Result<()> {
        self.enable_pin
            .set_state(self.config.enable_level.active())
            .map_err(Error::pin)?;
        self.state.power = PowerState::Enabled;
        info!("{}: enabled", self.name());
        Ok(())
    }

    /// Unpower the driver stage.
    ///
    /// The state is only updated if the EN write succeeds.
    pub fn disable(&mut self) -> Result<()> {
        self.enable_pin
            .set_state(self.config.enable_level.inactive())
            .map_err(Error::pin)?;
        self.state.power = PowerState::Disabled;
        info!("{}: disabled", self.name());
        Ok(())
    }

    /// Install endstops and the software max position.
    ///
    /// The configuration is stored even when it is not usable for homing; in
    /// that case `MotorError::EndstopUnsupported` is returned so the caller
    /// knows [`seek_min`](Self::seek_min) will refuse to run.
    pub fn configure_end_detection(
        &mut self,
        min: Option<ES>,
        max: Option<ES>,
        max_position: Degrees,
    ) -> Result<()> {
        self.endstops = EndDetection::new(min, max);
        self.state.max_position = max_position;

        if self.end_detection_usable() {
            Ok(())
        } else {
            Err(MotorError::EndstopUnsupported.into())
        }
    }

    /// Remove the endstops and hand them back.
    pub fn clear_end_detection(&mut self) -> EndDetection<ES> {
        core::mem::take(&mut self.endstops)
    }

    /// Mutable access to the installed endstops.
    #[inline]
    pub fn endstops_mut(&mut self) -> &mut EndDetection<ES> {
        &mut self.endstops
    }

    /// Whether the endstop configuration supports homing.
    #[inline]
    pub fn end_detection_usable(&self) -> bool {
        self.endstops.is_usable(self.state.max_position)
    }

    /// Half-period of one step pulse at the configured speed.
    #[inline]
    pub fn step_interval(&self) -> Result<Duration> {
        self.config.step_interval()
    }

    /// Emit one step pulse: STEP low for `half_period`, then high for
    /// `half_period`.
    ///
    /// A failed low write still holds the low phase, then aborts before the
    /// high write. With `check_ends` set (and `check_endstops_while_moving`
    /// configured) every installed endstop is polled after the pulse; if one
    /// is closed, `MotorError::OutOfRange` is returned even though the step
    /// was made. A failed high write is returned right away and the endstops
    /// are not polled for that pulse.
    pub fn pulse(&mut self, half_period: Duration, check_ends: bool) -> Result<()> {
        let low = self.step_pin.set_low().map_err(Error::pin);
        motion::sleep_for(&mut self.delay, half_period);
        low?;

        self.step_pin.set_high().map_err(Error::pin)?;
        motion::sleep_for(&mut self.delay, half_period);

        if check_ends && self.config.check_endstops_while_moving && self.endstops.any_detected() {
            return Err(MotorError::OutOfRange.into());
        }
        Ok(())
    }

    /// Step `count` microsteps in the current direction with endstop
    /// checking.
    ///
    /// Stops at the first failed pulse and reports how many completed.
    pub fn move_steps(&mut self, count: u32) -> StepResult {
        let half_period = self.step_interval().map_err(|e| (0, e))?;

        for done in 0..count {
            self.pulse(half_period, true).map_err(|e| (done, e))?;
        }
        Ok(count)
    }

    /// Step in the current direction until `endstop` reports the end.
    ///
    /// The endstop is polled before every pulse, so an already closed
    /// endstop yields zero steps. There is no step limit: an endstop that
    /// never closes keeps the motor turning.
    pub fn seek_while_open<D>(&mut self, endstop: &mut D) -> StepResult
    where
        D: EndDetector + ?Sized,
    {
        let half_period = self.step_interval().map_err(|e| (0, e))?;
        let mut steps: u32 = 0;

        loop {
            match endstop.end_detected() {
                Ok(true) => return Ok(steps),
                Ok(false) => {}
                Err(e) => return Err((steps, e)),
            }
            self.pulse(half_period, false).map_err(|e| (steps, e))?;
            steps = steps.saturating_add(1);
        }
    }

    /// Turn by a relative angle.
    ///
    /// The step count is truncated toward zero, so angles below one
    /// microstep move nothing and succeed. The position is updated by the
    /// steps actually made, also when the move is cut short.
    pub fn move_by(&mut self, angle: Degrees) -> Result<()> {
        if angle.value() == 0.0 {
            return Ok(());
        }

        let direction = Direction::from_angle(angle);
        self.set_direction(direction)?;

        let requested = self.config.microsteps_for(angle);
        debug!("{}: moving {} by {} steps", self.name(), angle, requested);

        let (moved, result) = match self.move_steps(requested) {
            Ok(moved) => (moved, Ok(())),
            Err((moved, e)) => (moved, Err(e)),
        };
        self.advance(direction, moved);

        if let Err(ref e) = result {
            warn!("{}: move stopped after {}/{} steps: {}", self.name(), moved, requested, e);
        }
        result
    }

    /// Home against the min endstop.
    ///
    /// Requires a usable end detection configuration. On success the motor
    /// is calibrated and the position is reset to zero.
    pub fn seek_min(&mut self) -> Result<()> {
        if !self.end_detection_usable() {
            return Err(MotorError::EndstopUnsupported.into());
        }
        self.set_direction(Direction::CounterClockwise)?;

        let Some(mut min) = self.endstops.min.take() else {
            return Err(MotorError::EndstopUnsupported.into());
        };
        let result = self.seek_while_open(&mut min);
        self.endstops.min = Some(min);

        let steps = result.map_err(|(_, e)| e)?;
        self.state.calibrated = true;
        self.state.position = Degrees::ZERO;
        info!("{}: min reached after {} steps", self.name(), steps);
        Ok(())
    }

    /// Move to the max end of travel. Requires calibration.
    ///
    /// With a max endstop, seek it and record the reached position as the
    /// new max position. Without one, move to the software max position if
    /// it is ahead. Otherwise do nothing.
    pub fn seek_max(&mut self) -> Result<()> {
        if !self.state.calibrated {
            return Err(MotorError::NotCalibrated.into());
        }

        if let Some(mut max) = self.endstops.max.take() {
            if let Err(e) = self.set_direction(Direction::Clockwise) {
                self.endstops.max = Some(max);
                return Err(e);
            }
            let result = self.seek_while_open(&mut max);
            self.endstops.max = Some(max);

            let (steps, result) = match result {
                Ok(steps) => (steps, Ok(())),
                Err((steps, e)) => (steps, Err(e)),
            };
            self.advance(Direction::Clockwise, steps);
            self.state.max_position = self.state.position;
            info!("{}: max at {}", self.name(), self.state.position);
            result
        } else if self.state.max_position.value() > 0.0
            && self.state.position < self.state.max_position
        {
            self.move_by(self.state.max_position - self.state.position)
        } else {
            Ok(())
        }
    }

    /// Move to the middle of the travel. Requires calibration and a known
    /// max position.
    pub fn seek_center(&mut self) -> Result<()> {
        if !self.state.calibrated || self.state.max_position.value() <= 0.0 {
            return Err(MotorError::NotCalibrated.into());
        }
        let center = Degrees(self.state.max_position.value() / 2.0);
        self.move_by(center - self.state.position)
    }

    /// Run a named command.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Move(angle) => self.move_by(angle),
            Command::Min => self.seek_min(),
            Command::Max => self.seek_max(),
            Command::Center => self.seek_center(),
            Command::Enable => self.enable(),
            Command::Disable => self.disable(),
        }
    }

    /// Pop the most recent error left by an asynchronous move.
    #[inline]
    pub fn take_last_error(&mut self) -> Option<Error> {
        self.state.take_last_error()
    }

    /// Queue an error for [`take_last_error`](Self::take_last_error).
    #[inline]
    pub fn push_error(&mut self, error: Error) {
        self.state.push_error(error);
    }

    /// Give back the pins, the delay provider and the endstops.
    pub fn release(self) -> (EN, DIR, STEP, DELAY, EndDetection<ES>) {
        (self.enable_pin, self.dir_pin, self.step_pin, self.delay, self.endstops)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.dir_pin
            .set_state(direction.pin_state(self.config.invert_direction))
            .map_err(Error::pin)
    }

    fn advance(&mut self, direction: Direction, steps: u32) {
        let moved = self.config.angle_for(steps);
        self.state.position += Degrees(moved.value() * direction.sign());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct NullPin;

    impl ErrorType for NullPin {
        type Error = Infallible;
    }

    impl OutputPin for NullPin {
        fn set_low(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Closes after `open_polls` polls.
    struct Countdown {
        open_polls: u32,
    }

    impl EndDetector for Countdown {
        fn end_detected(&mut self) -> Result<bool> {
            if self.open_polls == 0 {
                return Ok(true);
            }
            self.open_polls -= 1;
            Ok(false)
        }
    }

    fn motor() -> StepperMotor<NullPin, NullPin, NullPin, NoDelay, Countdown> {
        StepperMotor::new(NullPin, NullPin, NullPin, NoDelay, MotorConfig::default())
    }

    #[test]
    fn test_move_truncates_steps() {
        let mut m = motor();
        m.move_by(Degrees(100.0)).unwrap();
        // 55 steps of 1.8°
        assert!((m.position().value() - 99.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_move_is_noop() {
        let mut m = motor();
        m.set_position(Degrees(50.0));
        m.move_by(Degrees::ZERO).unwrap();
        assert_eq!(m.position(), Degrees(50.0));
    }

    #[test]
    fn test_seek_while_open_counts_steps() {
        let mut m = motor();
        let mut endstop = Countdown { open_polls: 9 };
        assert_eq!(m.seek_while_open(&mut endstop), Ok(9));
    }

    #[test]
    fn test_invalid_speed_moves_nothing() {
        let mut m = motor();
        m.config_mut().speed = 0.0;
        let err = m.move_by(Degrees(90.0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(m.position(), Degrees::ZERO);
    }

    #[test]
    fn test_seek_requires_usable_endstops() {
        let mut m = motor();
        assert_eq!(
            m.configure_end_detection(Some(Countdown { open_polls: 0 }), None, Degrees::ZERO),
            Err(MotorError::EndstopUnsupported.into())
        );
        assert_eq!(m.seek_min(), Err(MotorError::EndstopUnsupported.into()));
        assert_eq!(m.seek_max(), Err(MotorError::NotCalibrated.into()));
        assert_eq!(m.seek_center(), Err(MotorError::NotCalibrated.into()));
    }

    #[test]
    fn test_seek_min_calibrates() {
        let mut m = motor();
        m.set_position(Degrees(42.0));
        m.configure_end_detection(Some(Countdown { open_polls: 3 }), None, Degrees(360.0))
            .unwrap();
        m.seek_min().unwrap();
        assert!(m.is_calibrated());
        assert_eq!(m.position(), Degrees::ZERO);
    }

    #[test]
    fn test_execute_dispatches_commands() {
        let mut m = motor();
        m.configure_end_detection(Some(Countdown { open_polls: 4 }), None, Degrees(180.0))
            .unwrap();

        m.execute(Command::Enable).unwrap();
        assert_eq!(m.power_state(), PowerState::Enabled);

        assert_eq!(m.execute(Command::Center), Err(MotorError::NotCalibrated.into()));
        m.execute(Command::Min).unwrap();

        // Countdown stays closed, so checked moves would abort
        m.config_mut().check_endstops_while_moving = false;
        m.execute(Command::Max).unwrap();
        assert!((m.position().value() - 180.0).abs() < 1e-3);

        m.execute(Command::Center).unwrap();
        assert!((m.position().value() - 90.0).abs() < 1e-3);

        m.execute(Command::Move(Degrees(-9.0))).unwrap();
        assert!((m.position().value() - 81.0).abs() < 1e-3);

        m.execute(Command::Disable).unwrap();
        assert_eq!(m.power_state(), PowerState::Disabled);
    }

    #[test]
    fn test_max_position_is_read_at_build_time() {
        let config = MotorConfig {
            max_position: Some(Degrees(90.0)),
            ..MotorConfig::default()
        };
        let mut m: StepperMotor<NullPin, NullPin, NullPin, NoDelay, Countdown> =
            StepperMotor::new(NullPin, NullPin, NullPin, NoDelay, config);
        assert_eq!(m.max_position(), Degrees(90.0));

        m.config_mut().max_position = Some(Degrees(10.0));
        assert_eq!(m.max_position(), Degrees(90.0));

        m.set_max_position(Degrees(36.0));
        m.configure_end_detection(Some(Countdown { open_polls: 0 }), None, m.max_position())
            .unwrap();
        m.seek_min().unwrap();
        m.config_mut().check_endstops_while_moving = false;
        m.seek_max().unwrap();
        assert!((m.position().value() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_name() {
        let mut m = motor();
        assert_eq!(m.name(), "StepperMotor");
        m.set_name("mystepper");
        assert_eq!(m.name(), "mystepper");
    }
}
