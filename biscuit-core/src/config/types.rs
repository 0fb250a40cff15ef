//! Configuration type definitions
//!
//! These types represent the line configuration. The runtime loads them
//! from TOML; every field has a default so partial files are accepted.

use heapless::String;

use crate::conveyor::BELT_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of the raw payload and the stamp mark
pub const MAX_MARK_LEN: usize = 16;

/// Default wait after each pulse, and after each rotation
pub const DEFAULT_INTERVAL_MS: u32 = 5000;

/// Default stamper position
///
/// The newest biscuit sits here after the rotation that follows its
/// extrusion, so the next pulse (or the drain's stamp pulse) reaches it.
pub const DEFAULT_STAMPER_SLOT: usize = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timing interval is zero
    ZeroInterval,
    /// Stamper position is past the belt end
    SlotOutOfRange,
    /// Raw payload is empty
    EmptyPayload,
    /// Stamp mark is empty
    EmptyMark,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroInterval => f.write_str("timing intervals must be non-zero"),
            ConfigError::SlotOutOfRange => f.write_str("stamper slot is past the belt end"),
            ConfigError::EmptyPayload => f.write_str("raw payload must not be empty"),
            ConfigError::EmptyMark => f.write_str("stamp mark must not be empty"),
        }
    }
}

/// Line configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineConfig {
    /// Wait after a pulse before the belt moves (ms)
    pub pulse_interval_ms: u32,
    /// Wait after the belt moves before the next cycle (ms)
    pub settle_interval_ms: u32,
    /// Belt slot the stamper acts on
    pub stamper_slot: usize,
    /// Payload the extruder deposits
    pub raw_payload: String<MAX_MARK_LEN>,
    /// Mark the stamper appends
    pub stamp_mark: String<MAX_MARK_LEN>,
}

impl Default for LineConfig {
    fn default() -> Self {
        let mut raw_payload = String::new();
        let _ = raw_payload.push_str("..B..e..");
        let mut stamp_mark = String::new();
        let _ = stamp_mark.push_str("s..");

        Self {
            pulse_interval_ms: DEFAULT_INTERVAL_MS,
            settle_interval_ms: DEFAULT_INTERVAL_MS,
            stamper_slot: DEFAULT_STAMPER_SLOT,
            raw_payload,
            stamp_mark,
        }
    }
}

impl LineConfig {
    /// Check the configuration for values the line cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulse_interval_ms == 0 || self.settle_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.stamper_slot >= BELT_LEN {
            return Err(ConfigError::SlotOutOfRange);
        }
        if self.raw_payload.is_empty() {
            return Err(ConfigError::EmptyPayload);
        }
        if self.stamp_mark.is_empty() {
            return Err(ConfigError::EmptyMark);
        }
        Ok(())
    }
}
