//! Error types for stepper-homing library.
//!
//! Provides unified error handling across configuration, motor control, and pin I/O.

use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-homing operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
    /// Digital line read or write failed
    Pin(ErrorKind),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Microstepping multiplier must be at least 1
    IncorrectMicrostepping(u16),
    /// Steps per revolution must be at least 1
    IncorrectStepsPerRevolution(u16),
    /// Speed must be strictly positive (RPM)
    IncorrectSpeed(f32),
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Builder is missing a required field
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Seeking max or center before a successful seek to min
    NotCalibrated,
    /// End detection is not configured well enough for homing
    EndstopUnsupported,
    /// An endstop fired during a plain move
    OutOfRange,
    /// An asynchronous move ended without reporting its outcome
    MoveInterrupted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Pin(kind) => write!(f, "GPIO pin operation failed: {}", kind),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IncorrectMicrostepping(v) => {
                write!(f, "Incorrect microstepping: {}. Must be >= 1", v)
            }
            ConfigError::IncorrectStepsPerRevolution(v) => {
                write!(f, "Incorrect steps per revolution: {}. Must be >= 1", v)
            }
            ConfigError::IncorrectSpeed(v) => write!(f, "Incorrect speed: {} RPM. Must be > 0", v),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::NotCalibrated => write!(f, "Stepper motor was not calibrated"),
            MotorError::EndstopUnsupported => {
                write!(f, "End detection needs a min endstop and a max endstop or max position")
            }
            MotorError::OutOfRange => write!(f, "Endstop reached while moving"),
            MotorError::MoveInterrupted => write!(f, "Move ended without reporting a result"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::Pin(kind)
    }
}

impl Error {
    /// Map any embedded-hal digital error onto [`Error::Pin`].
    #[inline]
    pub fn pin<E: embedded_hal::digital::Error>(e: E) -> Self {
        Error::Pin(e.kind())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_error_keeps_kind() {
        let e = Error::pin(ErrorKind::Other);
        assert_eq!(e, Error::Pin(ErrorKind::Other));
    }

    #[test]
    fn test_motor_error_conversion() {
        let e: Error = MotorError::OutOfRange.into();
        assert!(matches!(e, Error::Motor(MotorError::OutOfRange)));
    }
}
