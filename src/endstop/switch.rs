//! Polled limit switch on a digital input line.

use embedded_hal::digital::{InputPin, PinState};
use heapless::String;

use crate::error::{Error, Result};

use super::event::{EventKind, EventSink, LimitSwitchEvent, NoEvents};
use super::EndDetector;

/// Limit switch read from one input pin.
///
/// Stateless apart from its configuration: every call to
/// [`end_detected`](EndDetector::end_detected) is a fresh read with no
/// debouncing.
///
/// With `default_open = true` (the default, most mechanical endstops) a high
/// level means the end was reached. With `default_open = false` (e.g. optical
/// endstops) a low level means the end was reached.
pub struct LimitSwitch<PIN, SINK = NoEvents>
where
    PIN: InputPin,
    SINK: EventSink,
{
    /// Input line the switch is wired to.
    pin: PIN,

    /// Receiver of `EndDetected` and `Error` notifications.
    sink: SINK,

    /// Name carried in published events.
    name: String<32>,

    /// Polarity of the switch.
    default_open: bool,
}

impl<PIN: InputPin> LimitSwitch<PIN, NoEvents> {
    /// Create a switch that publishes nowhere.
    pub fn without_events(pin: PIN) -> Self {
        Self::new(pin, NoEvents)
    }
}

impl<PIN, SINK> LimitSwitch<PIN, SINK>
where
    PIN: InputPin,
    SINK: EventSink,
{
    /// Create a normally-open switch publishing to `sink`.
    pub fn new(pin: PIN, sink: SINK) -> Self {
        Self {
            pin,
            sink,
            name: String::try_from("LimitSwitch").unwrap_or_default(),
            default_open: true,
        }
    }

    /// Set the polarity.
    pub fn with_default_open(mut self, default_open: bool) -> Self {
        self.default_open = default_open;
        self
    }

    /// Apply a [`LimitSwitchConfig`](crate::config::LimitSwitchConfig).
    pub fn with_config(self, config: &crate::config::LimitSwitchConfig) -> Self {
        self.with_default_open(config.default_open)
    }

    /// Set the name used in events (truncated to 32 bytes).
    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    /// Get the switch name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Rename the switch (truncated to 32 bytes).
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for c in name.chars() {
            if self.name.push(c).is_err() {
                break;
            }
        }
    }

    /// Get the polarity.
    #[inline]
    pub fn default_open(&self) -> bool {
        self.default_open
    }

    /// Change the polarity.
    #[inline]
    pub fn set_default_open(&mut self, default_open: bool) {
        self.default_open = default_open;
    }

    /// Get the event sink.
    #[inline]
    pub fn sink(&self) -> &SINK {
        &self.sink
    }

    /// Give back the pin and the sink.
    pub fn release(self) -> (PIN, SINK) {
        (self.pin, self.sink)
    }

    fn publish(&mut self, kind: EventKind) {
        let event = LimitSwitchEvent {
            source: self.name.clone(),
            kind,
        };
        self.sink.publish(event);
    }
}

impl<PIN, SINK> EndDetector for LimitSwitch<PIN, SINK>
where
    PIN: InputPin,
    SINK: EventSink,
{
    fn end_detected(&mut self) -> Result<bool> {
        let level = match self.pin.is_high() {
            Ok(high) => PinState::from(high),
            Err(e) => {
                let err = Error::pin(e);
                warn!("limit switch {} read failed: {}", self.name.as_str(), err);
                self.publish(EventKind::Error(err.clone()));
                return Err(err);
            }
        };

        let triggered = match (self.default_open, level) {
            (true, PinState::High) | (false, PinState::Low) => true,
            _ => false,
        };

        if triggered {
            trace!("limit switch {} closed", self.name.as_str());
            self.publish(EventKind::EndDetected(level));
        }
        Ok(triggered)
    }
}
