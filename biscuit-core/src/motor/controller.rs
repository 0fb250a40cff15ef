//! Motor controller
//!
//! Owns the conveyor, the station dispatcher and the drain flags, and
//! applies control signals to them. The timed part of the loop lives in
//! [`super::cycle`].

use crate::config::LineConfig;
use crate::conveyor::{ConveyorState, INPUT_SLOT};
use crate::dispatch::Dispatcher;
use crate::safety::IntegrityMonitor;
use crate::state::{Command, LineEvent, MotorState};
use crate::traits::EventSink;

/// What the caller must do after a control signal was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    /// Nothing; either idle or the running loop picks the change up
    None,
    /// Motor went from idle to working, start the run loop
    StartLoop,
    /// Motor halted and oven-off was emitted
    Halted,
}

/// Snapshot of the line for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineStatus {
    /// Current motor state
    pub state: MotorState,
    /// Completed pulse cycles
    pub revolutions: u32,
    /// Biscuits collected off the belt
    pub ready: usize,
    /// Biscuits still on the belt
    pub in_flight: usize,
}

/// Conveyor motor
pub struct Motor {
    /// Line configuration
    pub(super) config: LineConfig,
    /// Current state
    pub(super) state: MotorState,
    /// Completed pulse cycles
    pub(super) revolutions: u32,
    /// Drain until the belt is empty, then halt
    pub(super) should_stop_motor: bool,
    /// Send one pulse-stamper on the next drain cycle
    pub(super) send_stamp_pulse: bool,
    /// Belt and ready biscuits
    pub(super) conveyor: ConveyorState,
    /// Stations subscribed to station events
    pub(super) dispatcher: Dispatcher,
    /// Invariant tracking
    pub(super) monitor: IntegrityMonitor,
}

impl Motor {
    /// Create a stopped motor with an empty belt
    pub fn new(config: LineConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            state: MotorState::Stopped,
            revolutions: 0,
            should_stop_motor: false,
            send_stamp_pulse: false,
            conveyor: ConveyorState::new(),
            dispatcher,
            monitor: IntegrityMonitor::new(),
        }
    }

    /// Get current state
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Check if the run loop should keep cycling
    pub fn is_working(&self) -> bool {
        self.state.is_working()
    }

    /// Completed pulse cycles
    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    /// Belt and ready biscuits
    pub fn conveyor(&self) -> &ConveyorState {
        &self.conveyor
    }

    /// Line configuration
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Integrity monitor
    pub fn monitor(&self) -> &IntegrityMonitor {
        &self.monitor
    }

    /// Station dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Check if a stop request is pending
    pub fn stop_requested(&self) -> bool {
        self.should_stop_motor
    }

    /// Check if the one-shot stamp pulse is still owed
    pub fn stamp_pending(&self) -> bool {
        self.send_stamp_pulse
    }

    /// Check if every biscuit that entered the belt has been collected
    pub fn is_drained(&self) -> bool {
        self.revolutions as usize == self.conveyor.ready().len()
    }

    /// Status snapshot
    pub fn status(&self) -> LineStatus {
        LineStatus {
            state: self.state,
            revolutions: self.revolutions,
            ready: self.conveyor.ready().len(),
            in_flight: self.conveyor.belt().occupied(),
        }
    }

    /// Apply a control signal
    pub fn handle<S: EventSink>(&mut self, command: Command, sink: &mut S) -> Directive {
        match command {
            Command::OvenReady => self.on(),
            Command::MotorPause => {
                self.pause();
                Directive::None
            }
            Command::MotorOff => self.off(sink),
        }
    }

    /// Start or resume cycling
    ///
    /// Never asks for a second loop while one is already working; a
    /// pending drain is cancelled.
    pub fn on(&mut self) -> Directive {
        info!("Motor has been turned ON");

        let was_working = self.state.is_working();
        self.state = self.state.transition(Command::OvenReady, self.is_drained());
        self.should_stop_motor = false;
        self.send_stamp_pulse = false;

        if was_working {
            debug!("Motor already cycling, keeping the current loop");
            Directive::None
        } else {
            Directive::StartLoop
        }
    }

    /// Stop cycling at the top of the next iteration
    ///
    /// Counters, flags and the belt are kept for a later `on()`.
    pub fn pause(&mut self) {
        info!("Motor has been paused");
        self.state = self.state.transition(Command::MotorPause, self.is_drained());
    }

    /// Halt now if the belt is drained, otherwise drain first
    pub fn off<S: EventSink>(&mut self, sink: &mut S) -> Directive {
        info!("Motor has been turned OFF");

        let drained = self.is_drained();
        let ready = self.conveyor.ready().len();
        self.monitor
            .check_off(self.state == MotorState::Off, self.revolutions, ready);

        let was_working = self.state.is_working();
        if self.state.transition(Command::MotorOff, drained) == MotorState::Off {
            self.halt(sink);
            return Directive::Halted;
        }

        // The stamp pulse is owed once per drain, not once per request
        if !self.should_stop_motor {
            self.should_stop_motor = true;
            self.send_stamp_pulse = true;
        }
        self.state = MotorState::Draining;
        debug!(
            "Draining: {} revolutions, {} ready",
            self.revolutions,
            ready
        );

        if was_working {
            Directive::None
        } else {
            Directive::StartLoop
        }
    }

    /// Stop for good and tell the oven
    pub(super) fn halt<S: EventSink>(&mut self, sink: &mut S) {
        self.state = MotorState::Off;
        self.should_stop_motor = false;
        self.send_stamp_pulse = false;
        self.emit(LineEvent::OvenOff, sink);
        info!(
            "Motor halted after {} revolutions, {} ready",
            self.revolutions,
            self.conveyor.ready().len()
        );
    }

    /// Publish an event to the stations and the sink
    pub(super) fn emit<S: EventSink>(&mut self, event: LineEvent, sink: &mut S) {
        trace!("Emit {}", event.topic());

        if event == LineEvent::Pulse {
            self.monitor.record_pulse();
            let occupied = self.conveyor.belt().biscuit(INPUT_SLOT).is_some();
            self.monitor.check_input(occupied);
        }

        if event.is_station_event() {
            let report = self.dispatcher.publish(event, self.conveyor.belt_mut());
            if !report.is_clean() {
                warn!(
                    "{}: {} of {} stations failed",
                    event.topic(),
                    report.failed,
                    report.failed.saturating_add(report.delivered)
                );
            }
        }

        sink.publish(event);
    }
}
