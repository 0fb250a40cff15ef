//! Line assembly
//!
//! Wires the stations to the motor's dispatcher in belt order: the
//! extruder first, then the stamper.

use biscuit_core::config::LineConfig;
use biscuit_core::dispatch::Dispatcher;
use biscuit_core::motor::Motor;
use biscuit_drivers::station::{Extruder, Stamper};
use log::debug;

/// Build a stopped line with an empty belt
pub fn build_line(config: LineConfig) -> Motor {
    let mut dispatcher = Dispatcher::new();

    let extruder = dispatcher.subscribe(Box::new(Extruder::new(&config)), &Extruder::EVENTS);
    let stamper = dispatcher.subscribe(Box::new(Stamper::new(&config)), &Stamper::EVENTS);
    debug!(
        "Stations wired: extruder #{}, stamper #{} at slot {}",
        extruder.index(),
        stamper.index(),
        config.stamper_slot
    );

    Motor::new(config, dispatcher)
}
