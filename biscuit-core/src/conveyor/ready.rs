//! Completed biscuits and the shared conveyor state

use alloc::vec::Vec;

use super::belt::{Biscuit, ConveyorBelt};

/// Biscuits that have left the output end of the belt
///
/// Append-only; order is completion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadyBiscuits {
    items: Vec<Biscuit>,
}

impl ReadyBiscuits {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished biscuit
    pub fn push(&mut self, biscuit: Biscuit) {
        self.items.push(biscuit);
    }

    /// Number of finished biscuits
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing has finished yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recently finished biscuit
    pub fn last(&self) -> Option<&Biscuit> {
        self.items.last()
    }

    /// Iterate in completion order
    pub fn iter(&self) -> impl Iterator<Item = &Biscuit> {
        self.items.iter()
    }
}

/// Belt plus ready collection, owned by the motor
#[derive(Debug, Clone, Default)]
pub struct ConveyorState {
    belt: ConveyorBelt,
    ready: ReadyBiscuits,
}

impl ConveyorState {
    /// Create an empty conveyor
    pub fn new() -> Self {
        Self::default()
    }

    /// The belt
    pub fn belt(&self) -> &ConveyorBelt {
        &self.belt
    }

    /// Mutable belt, lent to stations during dispatch
    pub fn belt_mut(&mut self) -> &mut ConveyorBelt {
        &mut self.belt
    }

    /// Finished biscuits
    pub fn ready(&self) -> &ReadyBiscuits {
        &self.ready
    }

    /// Rotate the belt and collect whatever leaves the output end
    ///
    /// Returns true if a biscuit was collected.
    pub fn advance(&mut self) -> bool {
        match self.belt.rotate() {
            Some(biscuit) => {
                self.ready.push(biscuit);
                true
            }
            None => false,
        }
    }
}
