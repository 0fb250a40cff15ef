//! Shared helpers for line integration tests

#![allow(dead_code)]

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal_async::delay::DelayNs;

use biscuit_core::state::{Command, LineEvent};

pub type Commands = Channel<NoopRawMutex, Command, 8>;

pub const STAMP: &str = "s..";

/// Delay that completes immediately and queues scripted signals
///
/// A script entry `(n, command)` is sent right as the n-th wait ends.
/// Requested durations are summed so tests can check the timing plan.
pub struct ScriptedDelay<'a> {
    commands: &'a Commands,
    script: &'a [(u32, Command)],
    pub waits: u32,
    pub waited_ms: u64,
}

impl<'a> ScriptedDelay<'a> {
    pub fn new(commands: &'a Commands, script: &'a [(u32, Command)]) -> Self {
        Self {
            commands,
            script,
            waits: 0,
            waited_ms: 0,
        }
    }
}

impl DelayNs for ScriptedDelay<'_> {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.waits += 1;
        self.waited_ms += u64::from(ms);
        for (at, command) in self.script {
            if *at == self.waits {
                let _ = self.commands.try_send(*command);
            }
        }
    }
}

pub fn count(events: &[LineEvent], event: LineEvent) -> usize {
    events.iter().filter(|e| **e == event).count()
}
