//! # stepper-homing
//!
//! STEP/DIR/EN stepper motor control with limit-switch homing and
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Three-wire drivers**: EN, DIR and STEP lines as embedded-hal `OutputPin`s (DRV8825, A4988)
//! - **Constant-speed stepping**: pulse timing derived from RPM and microstepping
//! - **Endstops**: polled limit switches with configurable polarity and event notifications
//! - **Homing**: seek min, seek max (hardware or software end), seek center
//! - **Async moves**: start moves on several motors, join them later (`std`)
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_homing::{Degrees, LimitSwitch, StepperMotor};
//!
//! let mut motor = StepperMotor::builder()
//!     .enable_pin(en)
//!     .dir_pin(dir)
//!     .step_pin(step)
//!     .delay(delay)
//!     .min_endstop(LimitSwitch::without_events(min_pin))
//!     .max_endstop(LimitSwitch::without_events(max_pin))
//!     .build()?;
//!
//! motor.enable()?;
//! motor.seek_min()?;
//! motor.seek_max()?;
//! motor.seek_center()?;
//! motor.move_by(Degrees(-45.0))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading, shared motors and asynchronous moves
//! - `defmt`: Enables defmt logging for embedded targets
//! - `tracing`: Enables tracing logging on hosted targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod endstop;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, ActiveLevel, LimitSwitchConfig, MotorConfig, SystemConfig};
pub use endstop::{
    EndDetection, EndDetector, EventKind, EventSink, LimitSwitch, LimitSwitchEvent, NoEndstop,
    NoEvents,
};
pub use error::{Error, Result};
pub use motion::Direction;
pub use motor::{state, Command, PowerState, StepResult, StepperMotor, StepperMotorBuilder};

#[cfg(feature = "std")]
pub use motor::{MoveHandle, SharedStepper};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, UnitExt};
