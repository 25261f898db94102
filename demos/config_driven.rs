//! Configuration-driven motor example.
//!
//! Builds a motor from a TOML system configuration and runs a command
//! program read from TOML as well.
//!
//! Run with: `cargo run --example config_driven`

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use serde::Deserialize;
use stepper_homing::config::{parse_config, validate_config};
use stepper_homing::error::{ConfigError, Error};
use stepper_homing::{Command, LimitSwitch, StepperMotor};

const SYSTEM_TOML: &str = r#"
[motors.turntable]
name = "turntable"
steps_per_revolution = 200
microstepping = 4
speed_rpm = 120.0
check_endstops_while_moving = false
max_position_degrees = 300.0

[limit_switches.turntable_home]
default_open = false
"#;

const PROGRAM_TOML: &str = r#"
commands = [
    "enable",
    "min",
    "max",
    "center",
    { move = 45.0 },
    { move = -90.0 },
    "disable",
]
"#;

#[derive(Deserialize)]
struct Program {
    commands: Vec<Command>,
}

/// Output pin that does nothing.
struct MockPin;

impl ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Optical switch: high while the beam is clear, goes low after a few reads.
struct BeamPin {
    reads_left: u32,
}

impl ErrorType for BeamPin {
    type Error = core::convert::Infallible;
}

impl InputPin for BeamPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let clear = self.reads_left > 0;
        self.reads_left = self.reads_left.saturating_sub(1);
        Ok(clear)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that returns immediately.
struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn main() -> stepper_homing::Result<()> {
    println!("=== Configuration-Driven Example ===\n");

    let config = parse_config(SYSTEM_TOML)?;
    validate_config(&config)?;

    for name in config.motor_names() {
        if let Some(motor) = config.motor(name) {
            println!(
                "{}: {} steps/rev x{} @ {} RPM, {} per microstep",
                name,
                motor.steps_per_revolution,
                motor.microstepping,
                motor.speed,
                motor.degrees_per_microstep()
            );
        }
    }

    let switch_config = config
        .limit_switch("turntable_home")
        .copied()
        .unwrap_or_default();
    let home = LimitSwitch::without_events(BeamPin {
        reads_left: 25,
    })
    .with_config(&switch_config)
    .with_name("turntable_home");

    let mut motor = StepperMotor::builder()
        .from_config(&config, "turntable")?
        .enable_pin(MockPin)
        .dir_pin(MockPin)
        .step_pin(MockPin)
        .delay(MockDelay)
        .min_endstop(home)
        .build()?;

    println!("Step interval: {:?}\n", motor.step_interval()?);

    let program: Program = toml::from_str(PROGRAM_TOML).map_err(|e| {
        eprintln!("Program parse error: {}", e);
        Error::Config(ConfigError::ParseError(
            heapless::String::try_from("invalid program").unwrap_or_default(),
        ))
    })?;

    for command in program.commands {
        match motor.execute(command) {
            Ok(()) => println!(
                "{:<8} -> position {}, {:?}",
                command.name(),
                motor.position(),
                motor.power_state()
            ),
            Err(e) => println!("{:<8} -> failed: {}", command.name(), e),
        }
    }

    Ok(())
}
