//! Shared helpers for integration tests.

#![allow(dead_code)]

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use stepper_homing::{EndDetector, MotorConfig, StepperMotor};

/// Motor wired to mock pins.
pub type MockMotor<ES> = StepperMotor<PinMock, PinMock, PinMock, NoopDelay, ES>;

/// Expected STEP transactions for `n` pulses.
pub fn pulses(n: usize) -> Vec<PinTransaction> {
    (0..n)
        .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
        .collect()
}

/// Expected input reads: `open` open polls, then one closed poll.
pub fn reads_until_closed(open: usize) -> Vec<PinTransaction> {
    let mut reads = vec![PinTransaction::get(State::Low); open];
    reads.push(PinTransaction::get(State::High));
    reads
}

/// Build a motor on clones of the given mocks.
pub fn mock_motor<ES: EndDetector>(
    en: &PinMock,
    dir: &PinMock,
    step: &PinMock,
    config: MotorConfig,
) -> MockMotor<ES> {
    StepperMotor::builder()
        .enable_pin(en.clone())
        .dir_pin(dir.clone())
        .step_pin(step.clone())
        .delay(NoopDelay::new())
        .from_motor_config(&config)
        .build()
        .expect("all pins given")
}

/// Output pin that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPin;

impl ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Delay that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Assert two angles are within `tolerance` degrees.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
