//! Builder pattern for StepperMotor.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Degrees;
use crate::config::{ActiveLevel, MotorConfig, SystemConfig};
use crate::endstop::{EndDetector, NoEndstop};
use crate::error::{ConfigError, Error, Result};

use super::driver::StepperMotor;

/// Builder for creating StepperMotor instances.
///
/// Starts from [`MotorConfig::default`]; any field not set keeps its default.
pub struct StepperMotorBuilder<EN, DIR, STEP, DELAY, ES = NoEndstop>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    enable_pin: Option<EN>,
    dir_pin: Option<DIR>,
    step_pin: Option<STEP>,
    delay: Option<DELAY>,
    config: MotorConfig,
    min_endstop: Option<ES>,
    max_endstop: Option<ES>,
}

impl<EN, DIR, STEP, DELAY, ES> Default for StepperMotorBuilder<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<EN, DIR, STEP, DELAY, ES> StepperMotorBuilder<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            enable_pin: None,
            dir_pin: None,
            step_pin: None,
            delay: None,
            config: MotorConfig::default(),
            min_endstop: None,
            max_endstop: None,
        }
    }

    /// Set the EN pin.
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name (ignored if longer than 32 bytes).
    pub fn name(mut self, name: &str) -> Self {
        if let Ok(name) = heapless::String::try_from(name) {
            self.config.name = name;
        }
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.config.steps_per_revolution = steps;
        self
    }

    /// Set the microstepping multiplier.
    pub fn microstepping(mut self, microstepping: u16) -> Self {
        self.config.microstepping = microstepping;
        self
    }

    /// Set the EN level that powers the driver.
    pub fn enable_level(mut self, level: ActiveLevel) -> Self {
        self.config.enable_level = level;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.config.invert_direction = invert;
        self
    }

    /// Set speed in revolutions per minute.
    pub fn speed_rpm(mut self, rpm: f32) -> Self {
        self.config.speed = rpm;
        self
    }

    /// Poll endstops after every step of plain moves.
    pub fn check_endstops_while_moving(mut self, check: bool) -> Self {
        self.config.check_endstops_while_moving = check;
        self
    }

    /// Set the software max position.
    pub fn max_position(mut self, max: Degrees) -> Self {
        self.config.max_position = Some(max);
        self
    }

    /// Set the min endstop.
    pub fn min_endstop(mut self, endstop: ES) -> Self {
        self.min_endstop = Some(endstop);
        self
    }

    /// Set the max endstop.
    pub fn max_endstop(mut self, endstop: ES) -> Self {
        self.max_endstop = Some(endstop);
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from SystemConfig by motor name.
    pub fn from_config(self, config: &SystemConfig, motor_name: &str) -> Result<Self> {
        let motor_config = config.motor(motor_name).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(motor_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_motor_config(motor_config))
    }

    /// Build the StepperMotor.
    ///
    /// Endstops given to the builder are installed without checking that
    /// they are usable for homing; [`StepperMotor::seek_min`] does that.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay provider is missing.
    pub fn build(self) -> Result<StepperMotor<EN, DIR, STEP, DELAY, ES>> {
        let enable_pin = self
            .enable_pin
            .ok_or(Error::Config(ConfigError::MissingField("enable_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let max_position = self.config.max_position.unwrap_or(Degrees::ZERO);
        let mut motor = StepperMotor::new(enable_pin, dir_pin, step_pin, delay, self.config);
        if self.min_endstop.is_some() || self.max_endstop.is_some() {
            // Unusable pairs are kept; homing reports them.
            if let Err(e) =
                motor.configure_end_detection(self.min_endstop, self.max_endstop, max_position)
            {
                warn!("{}: endstops installed but homing unavailable: {}", motor.name(), e);
            }
        }
        Ok(motor)
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

    #[test]
    fn test_missing_pin() {
        let result = StepperMotorBuilder::<NullPin, NullPin, NullPin, NoDelay>::new()
            .enable_pin(NullPin)
            .step_pin(NullPin)
            .delay(NoDelay)
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("dir_pin")))
        ));
    }

    #[test]
    fn test_builder_applies_settings() {
        let motor = StepperMotorBuilder::<NullPin, NullPin, NullPin, NoDelay>::new()
            .enable_pin(NullPin)
            .dir_pin(NullPin)
            .step_pin(NullPin)
            .delay(NoDelay)
            .name("z_axis")
            .microstepping(8)
            .speed_rpm(60.0)
            .max_position(Degrees(720.0))
            .build()
            .unwrap();

        assert_eq!(motor.name(), "z_axis");
        assert_eq!(motor.config().microstepping, 8);
        assert_eq!(motor.max_position(), Degrees(720.0));
        assert!(!motor.end_detection_usable());
    }

    #[test]
    fn test_lone_min_endstop_is_kept_but_unusable() {
        let mut motor = StepperMotorBuilder::<NullPin, NullPin, NullPin, NoDelay>::new()
            .enable_pin(NullPin)
            .dir_pin(NullPin)
            .step_pin(NullPin)
            .delay(NoDelay)
            .min_endstop(NoEndstop)
            .build()
            .unwrap();

        assert!(!motor.end_detection_usable());
        assert!(motor.endstops_mut().min.is_some());
        assert_eq!(
            motor.seek_min(),
            Err(Error::Motor(crate::error::MotorError::EndstopUnsupported))
        );

        motor.set_max_position(Degrees(180.0));
        assert!(motor.end_detection_usable());
    }

    #[test]
    fn test_builder_installs_endstops() {
        let motor = StepperMotorBuilder::<NullPin, NullPin, NullPin, NoDelay>::new()
            .enable_pin(NullPin)
            .dir_pin(NullPin)
            .step_pin(NullPin)
            .delay(NoDelay)
            .min_endstop(NoEndstop)
            .max_endstop(NoEndstop)
            .build()
            .unwrap();

        assert!(motor.end_detection_usable());
    }
}
