//! Stamper station
//!
//! Appends a stamp mark to the biscuit at a fixed belt position. Runs on
//! every production pulse and once more on the drain's stamp pulse, so the
//! last biscuit to enter the belt is stamped before the line halts.
//!
//! The default position is slot 1: the extruder fills slot 0 on the same
//! pulse, and that biscuit only reaches the stamper after the rotation.
//! Slot 0 stamps at the input slot itself, the literal layout of the line,
//! and is selected with `stamper_slot = 0`.

use heapless::String;

use biscuit_core::config::{LineConfig, MAX_MARK_LEN};
use biscuit_core::conveyor::ConveyorBelt;
use biscuit_core::state::LineEvent;
use biscuit_core::traits::{Station, StationError};

/// Stamper at a fixed belt position
#[derive(Debug, Clone)]
pub struct Stamper {
    /// Belt slot to act on
    slot: usize,
    /// Mark appended to the payload
    mark: String<MAX_MARK_LEN>,
    /// Biscuits stamped
    stamped: u32,
}

impl Stamper {
    /// Events the stamper subscribes to
    pub const EVENTS: [LineEvent; 2] = [LineEvent::Pulse, LineEvent::PulseStamper];

    /// Create a stamper from the line configuration
    pub fn new(config: &LineConfig) -> Self {
        Self {
            slot: config.stamper_slot,
            mark: config.stamp_mark.clone(),
            stamped: 0,
        }
    }

    /// Belt slot the stamper acts on
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Biscuits stamped so far
    pub fn stamped(&self) -> u32 {
        self.stamped
    }

    /// Stamp the biscuit at the stamper, if any
    fn stamp(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError> {
        let slot = belt
            .slot_mut(self.slot)
            .ok_or(StationError::SlotOutOfRange)?;

        match slot {
            Some(biscuit) => {
                biscuit.mark(&self.mark)?;
                self.stamped = self.stamped.saturating_add(1);
                trace!("Stamper marks slot {}: {}", self.slot, biscuit.as_str());
            }
            None => {
                trace!("Stamper: slot {} empty", self.slot);
            }
        }
        Ok(())
    }
}

impl Station for Stamper {
    fn name(&self) -> &'static str {
        "stamper"
    }

    fn on_pulse(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError> {
        self.stamp(belt)
    }

    fn on_stamp_pulse(&mut self, belt: &mut ConveyorBelt) -> Result<(), StationError> {
        self.stamp(belt)
    }
}
