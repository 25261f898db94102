//! Shared motor handle with asynchronous moves (std only).
//!
//! One lock per motor serializes every motion call, so two moves on the
//! same motor run one after the other instead of racing on its position.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use parking_lot::{Mutex, MutexGuard};

use crate::config::units::Degrees;
use crate::endstop::EndDetector;
use crate::error::{Error, MotorError, Result};

use super::driver::StepperMotor;

/// Cloneable, thread-safe handle to a [`StepperMotor`].
///
/// # Example
///
/// ```rust,ignore
/// let x = SharedStepper::new(x_motor);
/// let y = SharedStepper::new(y_motor);
///
/// // Move both axes together, then wait for both.
/// let hx = x.move_async(Degrees(90.0));
/// let hy = y.move_async(Degrees(-45.0));
/// hx.join()?;
/// hy.join()?;
/// ```
pub struct SharedStepper<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    inner: Arc<Mutex<StepperMotor<EN, DIR, STEP, DELAY, ES>>>,
}

impl<EN, DIR, STEP, DELAY, ES> Clone for SharedStepper<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<EN, DIR, STEP, DELAY, ES> SharedStepper<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
    DELAY: DelayNs,
    ES: EndDetector,
{
    /// Wrap a motor.
    pub fn new(motor: StepperMotor<EN, DIR, STEP, DELAY, ES>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(motor)),
        }
    }

    /// Lock the motor, waiting for any running move to finish.
    pub fn lock(&self) -> MutexGuard<'_, StepperMotor<EN, DIR, STEP, DELAY, ES>> {
        self.inner.lock()
    }

    /// Blocking relative move.
    pub fn move_by(&self, angle: Degrees) -> Result<()> {
        self.lock().move_by(angle)
    }

    /// Blocking seek to the min endstop.
    pub fn seek_min(&self) -> Result<()> {
        self.lock().seek_min()
    }

    /// Blocking seek to the max end of travel.
    pub fn seek_max(&self) -> Result<()> {
        self.lock().seek_max()
    }

    /// Blocking move to the middle of the travel.
    pub fn seek_center(&self) -> Result<()> {
        self.lock().seek_center()
    }

    /// Current position; waits for a running move to finish.
    pub fn position(&self) -> Degrees {
        self.lock().position()
    }

    /// Pop the most recent error left by an asynchronous move.
    pub fn take_last_error(&self) -> Option<Error> {
        self.lock().take_last_error()
    }

    /// Unwrap the motor if this is the last handle.
    pub fn try_into_inner(self) -> core::result::Result<StepperMotor<EN, DIR, STEP, DELAY, ES>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<EN, DIR, STEP, DELAY, ES> SharedStepper<EN, DIR, STEP, DELAY, ES>
where
    EN: OutputPin + Send + 'static,
    DIR: OutputPin + Send + 'static,
    STEP: OutputPin + Send + 'static,
    DELAY: DelayNs + Send + 'static,
    ES: EndDetector + Send + 'static,
{
    /// Start a relative move on a worker thread and return immediately.
    ///
    /// The worker waits for the motor lock, so moves issued back to back
    /// run in order of lock acquisition. A failure is both delivered to the
    /// handle and queued for [`take_last_error`](Self::take_last_error).
    pub fn move_async(&self, angle: Degrees) -> MoveHandle {
        let inner = Arc::clone(&self.inner);
        let (tx, rx) = mpsc::sync_channel(1);

        let thread = thread::spawn(move || {
            let result = {
                let mut motor = inner.lock();
                let result = motor.move_by(angle);
                if let Err(ref e) = result {
                    motor.push_error(e.clone());
                }
                result
            };
            let _ = tx.send(result);
        });

        MoveHandle {
            receiver: rx,
            thread: Some(thread),
            outcome: None,
        }
    }
}

/// Completion handle of an asynchronous move.
#[derive(Debug)]
pub struct MoveHandle {
    receiver: Receiver<Result<()>>,
    thread: Option<JoinHandle<()>>,
    outcome: Option<Result<()>>,
}

impl MoveHandle {
    /// Whether the worker has finished.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some() || self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Non-blocking poll for the outcome.
    pub fn try_result(&mut self) -> Option<Result<()>> {
        if self.outcome.is_none() {
            self.outcome = match self.receiver.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(MotorError::MoveInterrupted.into())),
            };
        }
        self.outcome.clone()
    }

    /// Wait for the move to finish and return its outcome.
    pub fn join(mut self) -> Result<()> {
        let outcome = match self.outcome.take() {
            Some(outcome) => outcome,
            None => self
                .receiver
                .recv()
                .unwrap_or(Err(MotorError::MoveInterrupted.into())),
        };
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        outcome
    }
}
