//! Configuration validation.

use crate::error::Result;

use super::SystemConfig;

/// Validate a system configuration up front.
///
/// Runs the step timing computation for every motor so that a bad
/// microstepping, steps per revolution or speed value is reported before
/// the first move rather than during it.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_name, motor) in config.motors.iter() {
        motor.step_interval()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotorConfig;
    use crate::error::{ConfigError, Error};

    #[test]
    fn test_invalid_microstepping() {
        let mut config = SystemConfig::default();
        let motor = MotorConfig {
            microstepping: 0,
            ..MotorConfig::default()
        };
        config
            .motors
            .insert(heapless::String::try_from("x").unwrap(), motor)
            .unwrap();

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::IncorrectMicrostepping(0)))
        ));
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&SystemConfig::default()).is_ok());
    }
}
