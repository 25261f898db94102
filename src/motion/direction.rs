//! Direction of motion and its mapping onto the DIR line.

use embedded_hal::digital::PinState;

use crate::config::units::Degrees;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise, toward the max endstop (positive angles).
    Clockwise,
    /// Counter-clockwise, toward the min endstop (negative angles).
    CounterClockwise,
}

impl Direction {
    /// Get direction from a signed angle. Zero counts as clockwise.
    #[inline]
    pub fn from_angle(angle: Degrees) -> Self {
        if angle.is_negative() {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    /// Level to drive on the DIR line.
    ///
    /// Clockwise is high unless the wiring is inverted.
    #[inline]
    pub fn pin_state(self, invert: bool) -> PinState {
        let high = match self {
            Direction::Clockwise => !invert,
            Direction::CounterClockwise => invert,
        };
        PinState::from(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_angle() {
        assert_eq!(Direction::from_angle(Degrees(10.0)), Direction::Clockwise);
        assert_eq!(Direction::from_angle(Degrees(-0.5)), Direction::CounterClockwise);
    }

    #[test]
    fn test_pin_state_inversion() {
        assert_eq!(Direction::Clockwise.pin_state(false), PinState::High);
        assert_eq!(Direction::Clockwise.pin_state(true), PinState::Low);
        assert_eq!(Direction::CounterClockwise.pin_state(false), PinState::Low);
        assert_eq!(Direction::CounterClockwise.pin_state(true), PinState::High);
    }
}
