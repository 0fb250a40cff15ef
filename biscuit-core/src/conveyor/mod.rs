//! Conveyor data model
//!
//! The belt is a fixed row of slots; biscuits enter at the input end and
//! are collected into the ready list when they leave the output end.

pub mod belt;
pub mod ready;

pub use belt::{Biscuit, ConveyorBelt, BELT_LEN, INPUT_SLOT, MAX_PAYLOAD_LEN, OUTPUT_SLOT};
pub use ready::{ConveyorState, ReadyBiscuits};
