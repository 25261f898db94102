//! Endstop module for stepper-homing.
//!
//! Provides the [`EndDetector`] capability, the polled [`LimitSwitch`] that
//! implements it, and the min/max pair the motor consults while stepping.

mod event;
mod switch;

pub use event::{EventKind, EventSink, LimitSwitchEvent, NoEvents};
pub use switch::LimitSwitch;

use crate::config::units::Degrees;
use crate::error::Result;

/// Anything that can report that the end of travel has been reached.
pub trait EndDetector {
    /// Poll once. `Ok(true)` means the end is reached.
    fn end_detected(&mut self) -> Result<bool>;
}

impl<T: EndDetector + ?Sized> EndDetector for &mut T {
    #[inline]
    fn end_detected(&mut self) -> Result<bool> {
        T::end_detected(self)
    }
}

#[cfg(feature = "std")]
impl<T: EndDetector + ?Sized> EndDetector for std::boxed::Box<T> {
    #[inline]
    fn end_detected(&mut self) -> Result<bool> {
        T::end_detected(self)
    }
}

/// Shared switch, e.g. one also watched by an application thread.
#[cfg(feature = "std")]
impl<T: EndDetector + ?Sized> EndDetector for std::sync::Arc<parking_lot::Mutex<T>> {
    fn end_detected(&mut self) -> Result<bool> {
        self.lock().end_detected()
    }
}

/// Placeholder detector type for motors without endstops. Never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEndstop;

impl EndDetector for NoEndstop {
    #[inline]
    fn end_detected(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Min and max endstops of one axis. Either may be absent.
#[derive(Debug)]
pub struct EndDetection<ES> {
    /// Endstop at the counter-clockwise end of travel.
    pub min: Option<ES>,
    /// Endstop at the clockwise end of travel.
    pub max: Option<ES>,
}

impl<ES> Default for EndDetection<ES> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<ES> EndDetection<ES> {
    /// Create a pair from optional endstops.
    pub fn new(min: Option<ES>, max: Option<ES>) -> Self {
        Self { min, max }
    }

    /// Whether homing can work: a min endstop plus either a max endstop or
    /// a positive software max position.
    pub fn is_usable(&self, max_position: Degrees) -> bool {
        self.min.is_some() && (self.max.is_some() || max_position.value() > 0.0)
    }
}

impl<ES: EndDetector> EndDetection<ES> {
    /// Poll min then max, skipping absent ones.
    ///
    /// Read failures count as "not detected"; the switch has already
    /// published them.
    pub fn any_detected(&mut self) -> bool {
        [self.min.as_mut(), self.max.as_mut()]
            .into_iter()
            .flatten()
            .any(|endstop| matches!(endstop.end_detected(), Ok(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use embedded_hal::digital::ErrorKind;

    struct Fixed(Result<bool>);

    impl EndDetector for Fixed {
        fn end_detected(&mut self) -> Result<bool> {
            self.0.clone()
        }
    }

    #[test]
    fn test_usability() {
        let none: EndDetection<NoEndstop> = EndDetection::default();
        assert!(!none.is_usable(Degrees(0.0)));
        assert!(!none.is_usable(Degrees(100.0)));

        let min_only = EndDetection::new(Some(NoEndstop), None);
        assert!(!min_only.is_usable(Degrees(0.0)));
        assert!(min_only.is_usable(Degrees(100.0)));

        let both = EndDetection::new(Some(NoEndstop), Some(NoEndstop));
        assert!(both.is_usable(Degrees(0.0)));

        let max_only = EndDetection::new(None, Some(NoEndstop));
        assert!(!max_only.is_usable(Degrees(100.0)));
    }

    #[test]
    fn test_any_detected_ignores_read_errors() {
        let mut pair = EndDetection::new(Some(Fixed(Err(Error::Pin(ErrorKind::Other)))), None);
        assert!(!pair.any_detected());

        let mut pair = EndDetection::new(Some(Fixed(Ok(false))), Some(Fixed(Ok(true))));
        assert!(pair.any_detected());
    }
}
