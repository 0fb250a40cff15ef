//! Station event dispatch
//!
//! In-process stand-in for the line's event channel: the motor publishes
//! station events here and the subscribed stations act on the belt.

pub mod bus;

pub use bus::{DispatchReport, Dispatcher, StationId};
