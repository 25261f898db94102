//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_homing::load_config;
///
/// let config = load_config("motors.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = truncated(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// Timing parameters are not checked here; call
/// [`validate_config`](super::validate_config) to reject them early.
///
/// # Errors
///
/// Returns an error if the TOML is invalid.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    toml::from_str(content).map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))
}

fn truncated<const N: usize>(msg: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[motors.x_axis]
name = "X-Axis"
"#;

        let config = parse_config(toml).unwrap();
        let motor = config.motor("x_axis").unwrap();
        assert_eq!(motor.steps_per_revolution, 200);
        assert_eq!(motor.speed, 30.0);
    }

    #[test]
    fn test_parse_with_switches() {
        let toml = r#"
[motors.x_axis]
name = "X-Axis"
microstepping = 16
enable_level = "high"
max_position_degrees = 1080.0

[limit_switches.x_min]

[limit_switches.x_max]
default_open = false
"#;

        let config = parse_config(toml).unwrap();
        assert!(config.limit_switch("x_min").unwrap().default_open);
        assert!(!config.limit_switch("x_max").unwrap().default_open);
    }

    #[test]
    fn test_parse_keeps_invalid_timing() {
        let config = parse_config("[motors.bad]\nspeed_rpm = 0.0\n").unwrap();
        assert!(config.motor("bad").unwrap().step_interval().is_err());
    }

    #[test]
    fn test_parse_error() {
        let result = parse_config("[motors.x_axis\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/motors.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
