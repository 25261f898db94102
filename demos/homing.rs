//! Homing example.
//!
//! Drives a simulated axis with a limit switch at each end: seeks the min
//! switch, measures the travel up to the max switch, centers, then runs an
//! asynchronous move through a shared handle.
//!
//! Run with: `cargo run --example homing`

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stepper_homing::{
    Degrees, LimitSwitch, LimitSwitchEvent, SharedStepper, StepperMotor, UnitExt,
};

/// Travel of the simulated axis, in full steps.
const TRAVEL_STEPS: i32 = 150;

/// Mechanical state shared by the simulated pins.
#[derive(Default)]
struct Axis {
    steps: AtomicI32,
    clockwise: AtomicBool,
}

struct DirPin(Arc<Axis>);

impl ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for DirPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.clockwise.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.clockwise.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Moves the axis one step on each rising edge.
struct StepPin(Arc<Axis>);

impl ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for StepPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let delta = if self.0.clockwise.load(Ordering::SeqCst) { 1 } else { -1 };
        self.0.steps.fetch_add(delta, Ordering::SeqCst);
        Ok(())
    }
}

struct EnablePin;

impl ErrorType for EnablePin {
    type Error = core::convert::Infallible;
}

impl OutputPin for EnablePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        println!("  [EN] driver powered");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("  [EN] driver released");
        Ok(())
    }
}

/// Normally-open switch that closes at one end of the axis.
struct SwitchPin {
    axis: Arc<Axis>,
    at_max: bool,
}

impl ErrorType for SwitchPin {
    type Error = core::convert::Infallible;
}

impl InputPin for SwitchPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let steps = self.axis.steps.load(Ordering::SeqCst);
        Ok(if self.at_max {
            steps >= TRAVEL_STEPS
        } else {
            steps <= 0
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

type Switch = LimitSwitch<SwitchPin, Sender<LimitSwitchEvent>>;

fn main() -> stepper_homing::Result<()> {
    println!("=== Homing Example ===\n");

    let axis = Arc::new(Axis::default());
    // Power-up position is unknown to the motor
    axis.steps.store(37, Ordering::SeqCst);

    let (events, received) = mpsc::channel();
    let min_switch: Switch = LimitSwitch::new(
        SwitchPin {
            axis: Arc::clone(&axis),
            at_max: false,
        },
        events.clone(),
    )
    .with_name("min");
    let max_switch: Switch = LimitSwitch::new(
        SwitchPin {
            axis: Arc::clone(&axis),
            at_max: true,
        },
        events,
    )
    .with_name("max");

    let mut motor = StepperMotor::builder()
        .name("x_axis")
        .enable_pin(EnablePin)
        .dir_pin(DirPin(Arc::clone(&axis)))
        .step_pin(StepPin(Arc::clone(&axis)))
        .delay(ThreadDelay)
        .steps_per_revolution(200)
        .speed_rpm(300.0)
        .min_endstop(min_switch)
        .max_endstop(max_switch)
        .build()?;

    println!("Motor: {}", motor.name());
    println!("Step interval: {:?}\n", motor.step_interval()?);

    motor.enable()?;

    motor.seek_min()?;
    println!("Homed: position {}, calibrated {}", motor.position(), motor.is_calibrated());

    motor.seek_max()?;
    println!("Travel measured: {}", motor.max_position());

    motor.seek_center()?;
    println!("Centered at {}", motor.position());
    println!(
        "Simulated axis at step {}\n",
        axis.steps.load(Ordering::SeqCst)
    );

    let shared = SharedStepper::new(motor);
    let handle = shared.move_async((-30.0_f64).degrees());
    println!("Async move started, finished yet: {}", handle.is_finished());
    handle.join()?;
    println!("Async move done, position {}", shared.position());

    // Moving past the min switch aborts with OutOfRange
    let result = shared.move_by(Degrees(-360.0));
    println!("Overrun: {:?}, position {}", result, shared.position());

    shared.lock().disable()?;

    println!("\nSwitch events:");
    for event in received.try_iter() {
        println!("  {}: {:?}", event.source, event.kind);
    }

    Ok(())
}
