//! Motor run loop
//!
//! One iteration pulses (or, while draining, heats and stamps), moves the
//! belt, and waits. Control signals queued while a wait is in progress are
//! applied once that wait completes; a wait is never cut short.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embedded_hal_async::delay::DelayNs;

use super::controller::Motor;
use crate::safety::IntegrityStatus;
use crate::state::{Command, LineEvent, MotorState};
use crate::traits::EventSink;

/// How an iteration of the run loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Motor was not working, nothing happened
    Idle,
    /// Motor keeps working, run another iteration
    Continued,
    /// Motor was paused during the iteration
    Paused,
    /// Motor halted and oven-off was emitted
    Halted,
}

impl Motor {
    /// Run one iteration of the loop
    pub async fn cycle<D, M, S, const N: usize>(
        &mut self,
        delay: &mut D,
        commands: &Receiver<'_, M, Command, N>,
        sink: &mut S,
    ) -> CycleOutcome
    where
        D: DelayNs,
        M: RawMutex,
        S: EventSink,
    {
        if !self.state.is_working() {
            return CycleOutcome::Idle;
        }

        if !self.should_stop_motor {
            self.emit(LineEvent::Pulse, sink);
            delay.delay_ms(self.config.pulse_interval_ms).await;
            self.revolutions = self.revolutions.saturating_add(1);
            self.monitor.check_revolutions(self.revolutions);
            self.apply_pending(commands, sink);
        } else {
            if self.send_stamp_pulse {
                self.send_stamp_pulse = false;
                self.emit(LineEvent::PulseStamper, sink);
            }
            self.emit(LineEvent::PulseOven, sink);
        }

        self.conveyor.advance();
        debug!(
            "Revolution {}: {} on belt, {} ready",
            self.revolutions,
            self.conveyor.belt().occupied(),
            self.conveyor.ready().len()
        );
        trace!("Belt: {:?}", self.conveyor.belt());

        delay.delay_ms(self.config.settle_interval_ms).await;
        self.apply_pending(commands, sink);

        if self.should_stop_motor {
            if self.is_drained() {
                self.halt(sink);
                return CycleOutcome::Halted;
            }

            let status = self.monitor.check_drain(
                self.conveyor.belt().is_empty(),
                self.revolutions,
                self.conveyor.ready().len(),
            );
            if let IntegrityStatus::Fault(_) = status {
                // Nothing left on the belt can ever satisfy the halt condition
                self.halt(sink);
                return CycleOutcome::Halted;
            }
        }

        match self.state {
            MotorState::Running | MotorState::Draining => CycleOutcome::Continued,
            MotorState::Off => CycleOutcome::Halted,
            MotorState::Stopped => CycleOutcome::Paused,
        }
    }

    /// Run iterations while the motor is working
    ///
    /// Returns `Idle` if the motor was not working to begin with, otherwise
    /// how the last iteration ended.
    pub async fn run_until_idle<D, M, S, const N: usize>(
        &mut self,
        delay: &mut D,
        commands: &Receiver<'_, M, Command, N>,
        sink: &mut S,
    ) -> CycleOutcome
    where
        D: DelayNs,
        M: RawMutex,
        S: EventSink,
    {
        loop {
            match self.cycle(delay, commands, sink).await {
                CycleOutcome::Continued => {}
                outcome => return outcome,
            }
        }
    }

    /// Apply every control signal queued during a wait
    fn apply_pending<M, S, const N: usize>(
        &mut self,
        commands: &Receiver<'_, M, Command, N>,
        sink: &mut S,
    ) where
        M: RawMutex,
        S: EventSink,
    {
        while let Ok(command) = commands.try_receive() {
            debug!("Applying {} mid-cycle", command.topic());
            let _ = self.handle(command, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conveyor::{INPUT_SLOT, OUTPUT_SLOT};
    use crate::dispatch::Dispatcher;
    use crate::motor::test_support::{line_motor, Dough, ScriptedDelay, STAMP};
    use crate::motor::Directive;
    use crate::safety::Fault;
    use crate::config::LineConfig;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;
    use proptest::prelude::*;

    fn count(events: &[LineEvent], event: LineEvent) -> usize {
        events.iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_cycle_when_stopped_is_idle() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[]);
        let mut motor = line_motor();
        let mut events = Vec::new();

        let outcome = block_on(motor.cycle(&mut delay, &channel.receiver(), &mut events));
        assert_eq!(outcome, CycleOutcome::Idle);
        assert!(events.is_empty());
        assert_eq!(delay.waits, 0);
    }

    #[test]
    fn test_six_cycles_then_pause() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(12, Command::MotorPause)]);
        let mut motor = line_motor();
        let mut events = Vec::new();

        assert_eq!(motor.on(), Directive::StartLoop);
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Paused);
        assert_eq!(motor.revolutions(), 6);
        assert_eq!(motor.conveyor().ready().len(), 1);
        assert_eq!(motor.conveyor().belt().occupied(), 5);
        assert_eq!(count(&events, LineEvent::Pulse), 6);

        // Newest biscuit waits for its stamp, the rest carry exactly one
        let belt = motor.conveyor().belt();
        assert!(belt.biscuit(INPUT_SLOT).is_none());
        assert_eq!(belt.biscuit(1).unwrap().mark_count(STAMP), 0);
        for slot in 2..=OUTPUT_SLOT {
            assert_eq!(belt.biscuit(slot).unwrap().mark_count(STAMP), 1);
        }
    }

    #[test]
    fn test_drain_after_six_cycles() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(12, Command::MotorOff)]);
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Halted);
        assert_eq!(motor.state(), MotorState::Off);
        assert_eq!(motor.revolutions(), 6);
        assert_eq!(motor.conveyor().ready().len(), 6);
        assert!(motor.conveyor().belt().is_empty());

        // Six active cycles, five drain cycles with a single wait each
        assert_eq!(delay.waits, 17);
        assert_eq!(count(&events, LineEvent::Pulse), 6);
        assert_eq!(count(&events, LineEvent::PulseStamper), 1);
        assert_eq!(count(&events, LineEvent::PulseOven), 5);
        assert_eq!(count(&events, LineEvent::OvenOff), 1);
        assert_eq!(events.last(), Some(&LineEvent::OvenOff));

        // No pulse after the stop request
        let first_drain = events
            .iter()
            .position(|e| *e == LineEvent::PulseStamper)
            .unwrap();
        assert!(events[first_drain..].iter().all(|e| *e != LineEvent::Pulse));

        // The last biscuit got its stamp from the drain's stamp pulse
        for biscuit in motor.conveyor().ready().iter() {
            assert_eq!(biscuit.mark_count(STAMP), 1);
        }
    }

    #[test]
    fn test_second_on_does_not_double_pulse() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(
            &channel,
            &[(1, Command::OvenReady), (3, Command::OvenReady), (6, Command::MotorPause)],
        );
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Paused);
        assert_eq!(motor.revolutions(), 3);
        assert_eq!(count(&events, LineEvent::Pulse), 3);
        assert_eq!(delay.waits, 6);
    }

    #[test]
    fn test_pause_lets_current_iteration_finish() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(1, Command::MotorPause)]);
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        // Paused during the pulse wait; rotation and settle still happen
        assert_eq!(outcome, CycleOutcome::Paused);
        assert_eq!(delay.waits, 2);
        assert_eq!(motor.revolutions(), 1);
        assert!(motor.conveyor().belt().biscuit(1).is_some());
    }

    #[test]
    fn test_pause_resume_preserves_belt() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(8, Command::MotorPause)]);
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        let belt_before = motor.conveyor().belt().clone();
        let revolutions_before = motor.revolutions();
        assert_eq!(revolutions_before, 4);

        assert_eq!(motor.on(), Directive::StartLoop);
        assert_eq!(motor.conveyor().belt(), &belt_before);
        assert_eq!(motor.revolutions(), revolutions_before);

        let mut delay = ScriptedDelay::new(&channel, &[(2, Command::MotorPause)]);
        block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));
        assert_eq!(motor.revolutions(), 5);
        assert_eq!(motor.conveyor().ready().len(), 0);
        assert_eq!(motor.conveyor().belt().occupied(), 5);
    }

    #[test]
    fn test_repeated_off_sends_one_stamp_pulse() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(
            &channel,
            &[(12, Command::MotorOff), (14, Command::MotorOff)],
        );
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Halted);
        assert_eq!(count(&events, LineEvent::PulseStamper), 1);
        assert_eq!(count(&events, LineEvent::OvenOff), 1);
    }

    #[test]
    fn test_pause_during_drain_then_off_resumes_drain() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(
            &channel,
            &[(12, Command::MotorOff), (14, Command::MotorPause)],
        );
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));
        assert_eq!(outcome, CycleOutcome::Paused);
        assert_eq!(motor.conveyor().ready().len(), 3);
        assert!(motor.stop_requested());

        assert_eq!(motor.off(&mut events), Directive::StartLoop);
        let mut delay = ScriptedDelay::new(&channel, &[]);
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Halted);
        assert_eq!(delay.waits, 3);
        assert_eq!(motor.conveyor().ready().len(), 6);
        assert_eq!(count(&events, LineEvent::PulseStamper), 1);
        assert_eq!(count(&events, LineEvent::OvenOff), 1);
    }

    #[test]
    fn test_on_during_drain_resumes_production() {
        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(
            &channel,
            &[
                (12, Command::MotorOff),
                (13, Command::OvenReady),
                (15, Command::MotorPause),
            ],
        );
        let mut motor = line_motor();
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Paused);
        assert_eq!(motor.revolutions(), 7);
        assert_eq!(count(&events, LineEvent::Pulse), 7);
        assert_eq!(count(&events, LineEvent::PulseOven), 1);
        assert_eq!(count(&events, LineEvent::OvenOff), 0);
    }

    #[test]
    fn test_stalled_drain_force_halts() {
        /// Extruder that never manages to deposit anything
        struct Jammed;

        impl crate::traits::Station for Jammed {
            fn name(&self) -> &'static str {
                "jammed"
            }

            fn on_pulse(
                &mut self,
                _belt: &mut crate::conveyor::ConveyorBelt,
            ) -> Result<(), crate::traits::StationError> {
                Err(crate::traits::StationError::PayloadFull)
            }
        }

        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(Jammed), &[LineEvent::Pulse]);
        let mut motor = Motor::new(LineConfig::default(), dispatcher);

        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(4, Command::MotorOff)]);
        let mut events = Vec::new();

        motor.on();
        let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(outcome, CycleOutcome::Halted);
        assert_eq!(motor.revolutions(), 2);
        assert!(motor.conveyor().ready().is_empty());
        assert_eq!(motor.monitor().last_fault(), Some(Fault::DrainStalled));
        assert_eq!(motor.dispatcher().failures(), 2);
        assert_eq!(count(&events, LineEvent::OvenOff), 1);
    }

    #[test]
    fn test_extruder_only_line_overrun_free() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(Dough), &[LineEvent::Pulse]);
        let mut motor = Motor::new(LineConfig::default(), dispatcher);

        let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
        let mut delay = ScriptedDelay::new(&channel, &[(20, Command::MotorOff)]);
        let mut events = Vec::new();

        motor.on();
        block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

        assert_eq!(motor.state(), MotorState::Off);
        assert_eq!(motor.conveyor().ready().len(), 10);
        assert!(motor.monitor().check().is_ok());
    }

    proptest! {
        #[test]
        fn test_ready_lags_revolutions_by_belt(cycles in 1u32..40) {
            let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
            let script = [(cycles * 2, Command::MotorPause)];
            let mut delay = ScriptedDelay::new(&channel, &script);
            let mut motor = line_motor();
            let mut events = Vec::new();

            motor.on();
            block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

            prop_assert_eq!(motor.revolutions(), cycles);
            prop_assert_eq!(motor.conveyor().ready().len(), cycles.saturating_sub(5) as usize);
            prop_assert_eq!(count(&events, LineEvent::Pulse), cycles as usize);
        }

        #[test]
        fn test_drain_always_collects_everything(cycles in 1u32..30) {
            let channel: Channel<NoopRawMutex, Command, 8> = Channel::new();
            let script = [(cycles * 2, Command::MotorOff)];
            let mut delay = ScriptedDelay::new(&channel, &script);
            let mut motor = line_motor();
            let mut events = Vec::new();

            motor.on();
            let outcome = block_on(motor.run_until_idle(&mut delay, &channel.receiver(), &mut events));

            prop_assert_eq!(outcome, CycleOutcome::Halted);
            prop_assert_eq!(motor.conveyor().ready().len(), cycles as usize);
            prop_assert_eq!(count(&events, LineEvent::OvenOff), 1);
            prop_assert!(count(&events, LineEvent::PulseStamper) <= 1);
            prop_assert!(motor.monitor().check().is_ok());
        }
    }
}
