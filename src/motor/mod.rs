//! Motor module for stepper-homing.
//!
//! Provides the stepper motor driver, its builder, runtime state and the
//! shared handle used for asynchronous moves.

mod builder;
mod command;
mod driver;
#[cfg(feature = "std")]
mod shared;
pub mod state;

pub use builder::StepperMotorBuilder;
pub use command::Command;
pub use driver::{StepResult, StepperMotor};
#[cfg(feature = "std")]
pub use shared::{MoveHandle, SharedStepper};
pub use state::{MotionState, PowerState};
