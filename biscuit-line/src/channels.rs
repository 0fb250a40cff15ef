//! Inter-task communication channels
//!
//! Control signals flow into the motor task through a bounded channel.
//! Line events flow out through a pub/sub channel so several listeners
//! (the oven, a logger, a test) can follow the same stream.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, Sender};
use embassy_sync::pubsub::{ImmediatePublisher, PubSubChannel};
use log::{debug, trace, warn};

use biscuit_core::state::{Command, LineEvent};
use biscuit_core::traits::EventSink;

/// Channel capacity for control signals
pub const COMMAND_CHANNEL_SIZE: usize = 8;

/// Line events buffered for slow subscribers
pub const EVENT_CAPACITY: usize = 16;

/// Maximum number of event subscribers
pub const EVENT_SUBSCRIBERS: usize = 4;

/// Maximum number of counted event publishers
pub const EVENT_PUBLISHERS: usize = 1;

/// Control signal channel type
pub type CommandChannel<M> = Channel<M, Command, COMMAND_CHANNEL_SIZE>;

/// Line event channel type
pub type EventChannel<M> =
    PubSubChannel<M, LineEvent, EVENT_CAPACITY, EVENT_SUBSCRIBERS, EVENT_PUBLISHERS>;

/// Control signals for the motor task (oven-ready, motor-pause, motor-off)
pub static COMMAND_CHANNEL: CommandChannel<CriticalSectionRawMutex> = Channel::new();

/// Events emitted by the motor (pulse, pulse-oven, pulse-stamper, oven-off)
pub static EVENT_CHANNEL: EventChannel<CriticalSectionRawMutex> = PubSubChannel::new();

/// Errors when routing a control signal by topic name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Topic does not name a control signal
    UnknownTopic,
    /// Command channel is full
    Full,
}

impl core::fmt::Display for RequestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequestError::UnknownTopic => f.write_str("unknown control topic"),
            RequestError::Full => f.write_str("command channel is full"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Queue a control signal by its topic name
///
/// Never blocks; the motor applies it at its next wait boundary.
pub fn request<M: RawMutex>(
    sender: Sender<'_, M, Command, COMMAND_CHANNEL_SIZE>,
    topic: &str,
) -> Result<Command, RequestError> {
    let command = Command::from_topic(topic).ok_or_else(|| {
        warn!("Ignoring unknown control topic {}", topic);
        RequestError::UnknownTopic
    })?;

    sender.try_send(command).map_err(|_| {
        warn!("Command channel full, dropping {}", command.topic());
        RequestError::Full
    })?;

    debug!("Queued {}", command.topic());
    Ok(command)
}

/// Event sink that forwards to a line event channel
///
/// Publishing never waits: when the buffer is full the oldest event is
/// dropped and lagging subscribers are told so.
pub struct EventPublisher<'a, M: RawMutex> {
    inner: ImmediatePublisher<
        'a,
        M,
        LineEvent,
        EVENT_CAPACITY,
        EVENT_SUBSCRIBERS,
        EVENT_PUBLISHERS,
    >,
    /// Events addressed to the oven (pulse-oven, oven-off)
    oven_events: u32,
}

impl<'a, M: RawMutex> EventPublisher<'a, M> {
    /// Create a sink publishing into `channel`
    pub fn new(channel: &'a EventChannel<M>) -> Self {
        Self {
            inner: channel.immediate_publisher(),
            oven_events: 0,
        }
    }

    /// Events published for the oven so far
    pub fn oven_events(&self) -> u32 {
        self.oven_events
    }
}

impl<M: RawMutex> EventSink for EventPublisher<'_, M> {
    fn publish(&mut self, event: LineEvent) {
        if event.is_oven_event() {
            self.oven_events = self.oven_events.saturating_add(1);
            debug!("Oven: {}", event.topic());
        } else {
            trace!("Publish {}", event.topic());
        }
        self.inner.publish_immediate(event);
    }
}
