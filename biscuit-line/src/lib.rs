//! Biscuit line runtime
//!
//! Wires the core logic and the stations to embassy channels:
//!
//! - `channels`: static command and event channels, topic routing
//! - `config`: TOML configuration with embedded defaults
//! - `line`: line assembly
//! - `tasks`: the motor task
//!
//! Logging goes through the `log` facade, together with the core and
//! station logs; install any logger to see it.

#![deny(unsafe_code)]

pub mod channels;
pub mod config;
pub mod line;
pub mod tasks;

pub use line::build_line;
