//! Configuration module for stepper-homing.
//!
//! Provides types for loading motor and limit switch configurations from
//! TOML files (with `std` feature) or building them in code.

mod motor;
mod switch;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motor::{ActiveLevel, MotorConfig};
pub use switch::LimitSwitchConfig;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, UnitExt};
