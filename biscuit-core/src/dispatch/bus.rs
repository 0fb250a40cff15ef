//! Synchronous per-topic station dispatch
//!
//! Stations subscribe to the station events (`pulse`, `pulse-stamper`).
//! Publishing runs every subscriber of the event in subscription order, to
//! completion, before returning. A subscriber that fails has its belt
//! changes rolled back so the next subscriber sees the belt as it was.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::conveyor::ConveyorBelt;
use crate::state::LineEvent;
use crate::traits::Station;

/// Handle returned when a station subscribes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationId(usize);

impl StationId {
    /// Registration index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Result of one publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchReport {
    /// Subscribers that completed
    pub delivered: u8,
    /// Subscribers that failed and were rolled back
    pub failed: u8,
}

impl DispatchReport {
    /// Check if every subscriber completed
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Station registry with one route per station event
#[derive(Default)]
pub struct Dispatcher {
    stations: Vec<Box<dyn Station>>,
    pulse_route: Vec<StationId>,
    stamp_route: Vec<StationId>,
    failures: u32,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station for the given events
    ///
    /// Events that are not station events are ignored.
    pub fn subscribe(&mut self, station: Box<dyn Station>, events: &[LineEvent]) -> StationId {
        let id = StationId(self.stations.len());

        for event in events {
            match event {
                LineEvent::Pulse => self.pulse_route.push(id),
                LineEvent::PulseStamper => self.stamp_route.push(id),
                other => {
                    warn!("{} cannot subscribe to {}", station.name(), other.topic());
                }
            }
        }

        debug!("Station {} subscribed as #{}", station.name(), id.0);
        self.stations.push(station);
        id
    }

    /// Number of subscribers for an event
    pub fn subscriber_count(&self, event: LineEvent) -> usize {
        match event {
            LineEvent::Pulse => self.pulse_route.len(),
            LineEvent::PulseStamper => self.stamp_route.len(),
            _ => 0,
        }
    }

    /// Total failed callbacks since creation
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Deliver an event to its subscribers
    pub fn publish(&mut self, event: LineEvent, belt: &mut ConveyorBelt) -> DispatchReport {
        let route = match event {
            LineEvent::Pulse => &self.pulse_route,
            LineEvent::PulseStamper => &self.stamp_route,
            _ => return DispatchReport::default(),
        };

        let mut report = DispatchReport::default();

        for id in route {
            let station = &mut self.stations[id.0];
            let snapshot = belt.clone();

            let result = match event {
                LineEvent::Pulse => station.on_pulse(belt),
                _ => station.on_stamp_pulse(belt),
            };

            match result {
                Ok(()) => report.delivered = report.delivered.saturating_add(1),
                Err(e) => {
                    *belt = snapshot;
                    report.failed = report.failed.saturating_add(1);
                    self.failures = self.failures.saturating_add(1);
                    warn!("{} failed on {}: {:?}", station.name(), event.topic(), e);
                }
            }
        }

        report
    }
}
