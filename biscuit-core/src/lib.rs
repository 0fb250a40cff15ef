//! Board-agnostic core logic for the biscuit line
//!
//! This crate contains all line logic that does not depend on a specific
//! runtime or station implementation:
//!
//! - Conveyor data model (belt slots, ready biscuits)
//! - Motor state machine and its run loop
//! - Per-topic station dispatch
//! - Station and event sink traits
//! - Integrity monitoring
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod config;
pub mod conveyor;
pub mod dispatch;
pub mod motor;
pub mod safety;
pub mod state;
pub mod traits;
