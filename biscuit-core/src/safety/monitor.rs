//! Integrity monitor implementation
//!
//! Tracks invariant violations of the line: counters drifting apart, raw
//! material landing on an occupied slot, and drains that can never finish.

/// Invariant violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Revolution count differs from the number of pulses emitted
    RevolutionMismatch,
    /// Pulse arrived while the input slot was still occupied
    InputOverrun,
    /// Belt is empty while draining but not every biscuit was collected
    DrainStalled,
    /// Stop requested while halted with work still unaccounted for
    UnaccountedWork,
}

/// Integrity check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntegrityStatus {
    /// All invariants hold
    Ok,
    /// Invariant violated
    Fault(Fault),
}

impl IntegrityStatus {
    /// Check if no fault was found
    pub fn is_ok(&self) -> bool {
        matches!(self, IntegrityStatus::Ok)
    }
}

/// Integrity monitor for the motor loop
#[derive(Debug, Clone, Default)]
pub struct IntegrityMonitor {
    /// Pulses emitted since creation
    pulses: u32,
    /// Number of faults recorded
    fault_count: u32,
    /// Most recent fault
    last_fault: Option<Fault>,
}

impl IntegrityMonitor {
    /// Create a new monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pulse emitted by the motor
    pub fn record_pulse(&mut self) {
        self.pulses = self.pulses.saturating_add(1);
    }

    /// Pulses emitted since creation
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Number of faults recorded
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Most recent fault
    pub fn last_fault(&self) -> Option<Fault> {
        self.last_fault
    }

    /// Record a fault
    pub fn record(&mut self, fault: Fault) -> IntegrityStatus {
        error!("Integrity fault: {:?}", fault);
        self.fault_count = self.fault_count.saturating_add(1);
        self.last_fault = Some(fault);
        IntegrityStatus::Fault(fault)
    }

    /// Check that a pulse is about to land on an empty input slot
    pub fn check_input(&mut self, input_occupied: bool) -> IntegrityStatus {
        if input_occupied {
            return self.record(Fault::InputOverrun);
        }
        IntegrityStatus::Ok
    }

    /// Check that every revolution was driven by exactly one pulse
    pub fn check_revolutions(&mut self, revolutions: u32) -> IntegrityStatus {
        if revolutions != self.pulses {
            return self.record(Fault::RevolutionMismatch);
        }
        IntegrityStatus::Ok
    }

    /// Check that a drain can still finish
    ///
    /// An empty belt with fewer collected biscuits than revolutions means
    /// the halt condition will never be met.
    pub fn check_drain(&mut self, belt_empty: bool, revolutions: u32, ready: usize) -> IntegrityStatus {
        if belt_empty && revolutions as usize != ready {
            return self.record(Fault::DrainStalled);
        }
        IntegrityStatus::Ok
    }

    /// Check a stop request against a halted motor
    pub fn check_off(&mut self, halted: bool, revolutions: u32, ready: usize) -> IntegrityStatus {
        if halted && revolutions as usize != ready {
            return self.record(Fault::UnaccountedWork);
        }
        IntegrityStatus::Ok
    }

    /// Check all tracked conditions
    ///
    /// Returns the most recent fault, or Ok if none was ever recorded.
    pub fn check(&self) -> IntegrityStatus {
        match self.last_fault {
            Some(fault) => IntegrityStatus::Fault(fault),
            None => IntegrityStatus::Ok,
        }
    }
}
