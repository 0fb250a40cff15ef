//! Conveyor motor
//!
//! The motor drives the timing loop: it pulses the stations, moves the
//! belt, collects finished biscuits, and decides when the oven may switch
//! off.

pub mod controller;
pub mod cycle;

pub use controller::{Directive, LineStatus, Motor};
pub use cycle::CycleOutcome;
