//! Station traits
//!
//! A station sits at a fixed belt position and acts on the slot there when
//! the motor pulses. Stations never own the belt; the dispatcher lends it
//! for the duration of one callback.

use crate::conveyor::ConveyorBelt;

/// Errors a station can report from a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationError {
    /// Payload has no room for another mark
    PayloadFull,
    /// Station is configured past the end of the belt
    SlotOutOfRange,
}

impl core::fmt::Display for StationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StationError::PayloadFull => f.write_str("biscuit payload is full"),
            StationError::SlotOutOfRange => f.write_str("station slot is past the belt end"),
        }
    }
}

/// Base trait for all stations on the line
pub trait Station {
    /// Station name for logging
    fn name(&self) -> &'static str;

    /// Handle an active production pulse
    fn on_pulse(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError>;

    /// Handle the one-shot stamp pulse sent when a drain begins
    ///
    /// Default implementation does nothing.
    fn on_stamp_pulse(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError> {
        let _ = belt;
        Ok(())
    }
}
