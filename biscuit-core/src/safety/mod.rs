//! Line integrity monitoring
//!
//! Invariant violations are logged and counted rather than silently
//! ignored.

pub mod monitor;

pub use monitor::{Fault, IntegrityMonitor, IntegrityStatus};
