//! Configuration loading
//!
//! Reads the line configuration from TOML, falling back to the defaults
//! compiled in from line.toml.

pub mod loader;

pub use loader::{load, parse_config, LoadError, EMBEDDED_CONFIG};
