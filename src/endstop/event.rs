//! Limit switch notifications.
//!
//! Events are handed to an [`EventSink`] at the moment they happen; there is
//! no buffering inside the switch itself.

use embedded_hal::digital::PinState;
use heapless::String;

use crate::error::Error;

/// What a limit switch observed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// The end of travel was detected; carries the raw line level.
    EndDetected(PinState),
    /// Reading the input line failed.
    Error(Error),
}

/// Notification published by a [`LimitSwitch`](super::LimitSwitch).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitSwitchEvent {
    /// Name of the switch that published the event.
    pub source: String<32>,
    /// The observation.
    pub kind: EventKind,
}

/// Receiver of limit switch notifications.
pub trait EventSink {
    /// Deliver one event. Must not block for long: it runs between step pulses.
    fn publish(&mut self, event: LimitSwitchEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSink for NoEvents {
    #[inline]
    fn publish(&mut self, _event: LimitSwitchEvent) {}
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    #[inline]
    fn publish(&mut self, event: LimitSwitchEvent) {
        T::publish(self, event)
    }
}

/// Fixed-capacity log; events past capacity are dropped.
impl<const N: usize> EventSink for heapless::Vec<LimitSwitchEvent, N> {
    fn publish(&mut self, event: LimitSwitchEvent) {
        let _ = self.push(event);
    }
}

#[cfg(feature = "std")]
impl EventSink for std::vec::Vec<LimitSwitchEvent> {
    fn publish(&mut self, event: LimitSwitchEvent) {
        self.push(event);
    }
}

/// Forwards to a channel; a disconnected receiver is ignored.
#[cfg(feature = "std")]
impl EventSink for std::sync::mpsc::Sender<LimitSwitchEvent> {
    fn publish(&mut self, event: LimitSwitchEvent) {
        let _ = self.send(event);
    }
}
