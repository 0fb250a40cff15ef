//! Conveyor belt slots and biscuit payloads

use heapless::String;

use crate::traits::StationError;

/// Number of slots on the belt
pub const BELT_LEN: usize = 6;

/// Slot where raw material enters the belt
pub const INPUT_SLOT: usize = 0;

/// Slot a biscuit occupies just before it leaves the belt
pub const OUTPUT_SLOT: usize = BELT_LEN - 1;

/// Maximum payload length, raw dough plus every mark applied to it
pub const MAX_PAYLOAD_LEN: usize = 32;

/// An in-progress biscuit and the processing marks it has collected
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Biscuit(String<MAX_PAYLOAD_LEN>);

impl Biscuit {
    /// Create a biscuit from raw extruded dough
    pub fn from_raw(raw: &str) -> Result<Self, StationError> {
        String::try_from(raw)
            .map(Self)
            .map_err(|_| StationError::PayloadFull)
    }

    /// Append a processing mark
    ///
    /// On overflow the payload is left untouched.
    pub fn mark(&mut self, mark: &str) -> Result<(), StationError> {
        self.0.push_str(mark).map_err(|_| StationError::PayloadFull)
    }

    /// Count how many times `mark` was applied
    pub fn mark_count(&self, mark: &str) -> usize {
        if mark.is_empty() {
            return 0;
        }
        self.0.matches(mark).count()
    }

    /// Raw payload text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Fixed-length conveyor belt
///
/// Index 0 is the input end, index `BELT_LEN - 1` the output end. The
/// length is part of the type, so rotation can never grow or shrink it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConveyorBelt {
    slots: [Option<Biscuit>; BELT_LEN],
}

impl ConveyorBelt {
    /// Create an empty belt
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        BELT_LEN
    }

    /// Get the content of a slot, `None` if the index is past the belt end
    pub fn slot(&self, index: usize) -> Option<&Option<Biscuit>> {
        self.slots.get(index)
    }

    /// Mutable access to a slot, `None` if the index is past the belt end
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<Biscuit>> {
        self.slots.get_mut(index)
    }

    /// Get the biscuit in a slot, if any
    pub fn biscuit(&self, index: usize) -> Option<&Biscuit> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Check if no slot holds a biscuit
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate over slots from input to output end
    pub fn iter(&self) -> impl Iterator<Item = &Option<Biscuit>> {
        self.slots.iter()
    }

    /// Advance the belt one position toward the output end
    ///
    /// Returns the biscuit that was in the output slot before the move.
    /// The input slot is always empty afterwards.
    pub fn rotate(&mut self) -> Option<Biscuit> {
        let exiting = self.slots[OUTPUT_SLOT].take();
        self.slots.rotate_right(1);
        debug_assert!(self.slots[INPUT_SLOT].is_none());
        exiting
    }
}
