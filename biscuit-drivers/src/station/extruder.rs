//! Extruder station
//!
//! Deposits a fresh piece of raw dough at the input slot on every pulse.
//!
//! The input slot is empty at pulse time in normal operation, because the
//! rotation that ends every cycle clears it. If it is ever occupied the
//! extruder still overwrites it and counts the overrun; the motor's
//! integrity monitor reports the same condition as a fault.

use heapless::String;

use biscuit_core::config::{LineConfig, MAX_MARK_LEN};
use biscuit_core::conveyor::{Biscuit, ConveyorBelt, INPUT_SLOT};
use biscuit_core::state::LineEvent;
use biscuit_core::traits::{Station, StationError};

/// Extruder at the input end of the belt
#[derive(Debug, Clone)]
pub struct Extruder {
    /// Payload deposited on each pulse
    raw_payload: String<MAX_MARK_LEN>,
    /// Biscuits deposited
    extruded: u32,
    /// Deposits that overwrote an occupied slot
    overruns: u32,
}

impl Extruder {
    /// Events the extruder subscribes to
    pub const EVENTS: [LineEvent; 1] = [LineEvent::Pulse];

    /// Create an extruder from the line configuration
    pub fn new(config: &LineConfig) -> Self {
        Self {
            raw_payload: config.raw_payload.clone(),
            extruded: 0,
            overruns: 0,
        }
    }

    /// Biscuits deposited so far
    pub fn extruded(&self) -> u32 {
        self.extruded
    }

    /// Deposits that landed on an occupied slot
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}

impl Station for Extruder {
    fn name(&self) -> &'static str {
        "extruder"
    }

    fn on_pulse(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError> {
        let biscuit = Biscuit::from_raw(&self.raw_payload)?;
        let slot = belt
            .slot_mut(INPUT_SLOT)
            .ok_or(StationError::SlotOutOfRange)?;

        if slot.is_some() {
            warn!("Extruder overrun: input slot still occupied");
            self.overruns = self.overruns.saturating_add(1);
        }

        trace!("Extruder deposits {}", biscuit.as_str());
        *slot = Some(biscuit);
        self.extruded = self.extruded.saturating_add(1);
        Ok(())
    }
}
