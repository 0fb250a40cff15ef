//! Async tasks
//!
//! The line runs as a single task that owns the motor; everything else
//! talks to it through channels.

pub mod motor;

pub use motor::{line_task, run_line, serve};
