//! Configuration types
//!
//! Board-agnostic configuration structures, serde-derivable for the
//! runtime's TOML loader.

pub mod types;

pub use types::*;
