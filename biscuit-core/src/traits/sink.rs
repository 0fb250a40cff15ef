//! Outbound event sink
//!
//! Everything the motor emits is published here, whether or not a station
//! also consumed it. The runtime forwards these to whoever listens for the
//! oven events; tests record them.

use alloc::vec::Vec;

use crate::state::LineEvent;

/// Receiver for events emitted by the motor
pub trait EventSink {
    /// Publish an event
    ///
    /// Must not block; the motor calls this between its timing waits.
    fn publish(&mut self, event: LineEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn publish(&mut self, event: LineEvent) {
        (**self).publish(event);
    }
}

/// Recording sink
impl EventSink for Vec<LineEvent> {
    fn publish(&mut self, event: LineEvent) {
        self.push(event);
    }
}
