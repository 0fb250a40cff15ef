//! Motor state machine definition
//!
//! Motor behavior is a function of the current state, a control signal,
//! and whether every biscuit that entered the belt has left it.

use super::events::Command;

/// Motor states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Not cycling; counters and belt are kept for a resume
    #[default]
    Stopped,
    /// Cycling with pulses, new biscuits enter every cycle
    Running,
    /// Cycling without pulses until the belt is empty
    Draining,
    /// Halted after the oven was told to switch off
    Off,
}

impl MotorState {
    /// Check if the run loop should keep cycling
    pub fn is_working(&self) -> bool {
        matches!(self, MotorState::Running | MotorState::Draining)
    }

    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            MotorState::Stopped => "Stopped",
            MotorState::Running => "Running",
            MotorState::Draining => "Draining",
            MotorState::Off => "Off",
        }
    }

    /// Process a control signal and return the next state
    ///
    /// `drained` is true when every biscuit that entered the belt has been
    /// collected, i.e. revolutions equal the ready count.
    pub fn transition(self, command: Command, drained: bool) -> Self {
        use Command::*;
        use MotorState::*;

        match (self, command) {
            // Start, resume, or cancel a pending drain
            (Stopped | Off | Draining, OvenReady) => Running,
            (Running, OvenReady) => Running,

            // Pause only stops cycling, Off is already halted
            (Running | Draining | Stopped, MotorPause) => Stopped,
            (Off, MotorPause) => Off,

            // Stop with nothing in flight halts right away
            (_, MotorOff) if drained => Off,
            (_, MotorOff) => Draining,
        }
    }
}
