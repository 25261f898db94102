//! Motor runtime state.

use heapless::Deque;

use crate::config::units::Degrees;
use crate::error::Error;

/// Capacity of the pending asynchronous error queue.
pub const PENDING_ERRORS: usize = 8;

/// Whether the driver stage is powered (EN line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// EN driven to the active level.
    Enabled,
    /// EN driven to the inactive level, or never driven.
    #[default]
    Disabled,
}

impl PowerState {
    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            PowerState::Enabled => "Enabled",
            PowerState::Disabled => "Disabled",
        }
    }
}

/// Everything the motor knows about where it is.
#[derive(Debug, Clone, Default)]
pub struct MotionState {
    /// Estimated shaft angle, accumulated from completed steps.
    pub position: Degrees,

    /// Driver power.
    pub power: PowerState,

    /// Set by a successful seek to min.
    pub calibrated: bool,

    /// Software end of travel; zero means undefined.
    pub max_position: Degrees,

    /// Errors of finished asynchronous moves, oldest first.
    pending_errors: Deque<Error, PENDING_ERRORS>,
}

impl MotionState {
    /// Fresh state with a software end of travel.
    pub fn with_max_position(max_position: Degrees) -> Self {
        Self {
            max_position,
            ..Self::default()
        }
    }

    /// Queue an error, evicting the oldest one when full.
    pub fn push_error(&mut self, error: Error) {
        if let Err(error) = self.pending_errors.push_back(error) {
            if let Some(dropped) = self.pending_errors.pop_front() {
                warn!("pending error queue full, dropping: {}", dropped);
            }
            let _ = self.pending_errors.push_back(error);
        }
    }

    /// Pop the most recently queued error.
    pub fn take_last_error(&mut self) -> Option<Error> {
        self.pending_errors.pop_back()
    }

    /// Number of queued errors.
    pub fn pending_error_count(&self) -> usize {
        self.pending_errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MotorError;

    #[test]
    fn test_errors_are_lifo() {
        let mut state = MotionState::default();
        assert_eq!(state.take_last_error(), None);

        state.push_error(MotorError::OutOfRange.into());
        state.push_error(MotorError::NotCalibrated.into());
        assert_eq!(state.take_last_error(), Some(MotorError::NotCalibrated.into()));
        assert_eq!(state.take_last_error(), Some(MotorError::OutOfRange.into()));
        assert_eq!(state.take_last_error(), None);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut state = MotionState::default();
        state.push_error(MotorError::NotCalibrated.into());
        for _ in 0..PENDING_ERRORS {
            state.push_error(MotorError::OutOfRange.into());
        }
        assert_eq!(state.pending_error_count(), PENDING_ERRORS);

        let mut drained = 0;
        while let Some(e) = state.take_last_error() {
            assert_eq!(e, Error::Motor(MotorError::OutOfRange));
            drained += 1;
        }
        assert_eq!(drained, PENDING_ERRORS);
    }

    #[test]
    fn test_with_max_position() {
        let mut state = MotionState::with_max_position(Degrees(270.0));
        assert_eq!(state.max_position, Degrees(270.0));
        assert_eq!(state.position, Degrees::ZERO);
        assert_eq!(state.pending_error_count(), 0);
        state.push_error(Error::Motor(MotorError::NotCalibrated));
        assert_eq!(state.pending_error_count(), 1);
    }

    #[test]
    fn test_initial_state() {
        let state = MotionState::default();
        assert_eq!(state.power, PowerState::Disabled);
        assert!(!state.calibrated);
        assert_eq!(state.max_position, Degrees::ZERO);
    }
}
