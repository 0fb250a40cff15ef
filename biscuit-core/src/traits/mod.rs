//! Line abstraction traits
//!
//! These traits define the interface between the motor and the things it
//! drives: stations on the belt and listeners for its events.

pub mod sink;
pub mod station;

pub use sink::EventSink;
pub use station::{Station, StationError};
