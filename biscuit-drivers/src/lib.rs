//! Station implementations
//!
//! This crate provides concrete implementations of the station trait
//! defined in biscuit-core:
//!
//! - Extruder: deposits raw dough at the input end of the belt
//! - Stamper: marks the biscuit at its belt position

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod station;
