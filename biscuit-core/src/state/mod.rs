//! Motor state machine
//!
//! The state machine is explicit, finite, and deterministic. Control
//! signals come in as [`Command`]s; the motor answers with [`LineEvent`]s.

pub mod events;
pub mod machine;

pub use events::{Command, LineEvent};
pub use machine::MotorState;
