//! Motor task
//!
//! Waits for a control signal, applies it, and runs the motor loop until
//! the motor stops working. The loop only ever runs inside this task, so a
//! second loop can never start alongside the first.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::Delay;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use biscuit_core::config::LineConfig;
use biscuit_core::motor::{CycleOutcome, Directive, Motor};
use biscuit_core::state::Command;
use biscuit_core::traits::EventSink;

use crate::channels::{EventPublisher, COMMAND_CHANNEL, EVENT_CHANNEL};
use crate::line::build_line;

/// Line task: build the line and serve the static channels forever
///
/// Timing waits use the embassy time driver.
pub async fn line_task(config: LineConfig) -> ! {
    let mut motor = build_line(config);
    let mut sink = EventPublisher::new(&EVENT_CHANNEL);
    let mut delay = Delay;

    run_line(&mut motor, &mut delay, COMMAND_CHANNEL.receiver(), &mut sink).await
}

/// Serve control signals from `commands` forever
pub async fn run_line<D, M, S, const N: usize>(
    motor: &mut Motor,
    delay: &mut D,
    commands: Receiver<'_, M, Command, N>,
    sink: &mut S,
) -> !
where
    D: DelayNs,
    M: RawMutex,
    S: EventSink,
{
    info!("Line task started");

    loop {
        let command = commands.receive().await;
        serve(motor, command, delay, &commands, sink).await;
    }
}

/// Apply one control signal, running the loop if it starts the motor
///
/// Signals arriving while the loop runs are picked up by the loop itself.
pub async fn serve<D, M, S, const N: usize>(
    motor: &mut Motor,
    command: Command,
    delay: &mut D,
    commands: &Receiver<'_, M, Command, N>,
    sink: &mut S,
) -> CycleOutcome
where
    D: DelayNs,
    M: RawMutex,
    S: EventSink,
{
    debug!("Command: {}", command.topic());

    match motor.handle(command, sink) {
        Directive::StartLoop => {
            let outcome = motor.run_until_idle(delay, commands, sink).await;
            let status = motor.status();
            info!(
                "Loop ended in {}: {} revolutions, {} ready, {} on the belt",
                status.state.name(),
                status.revolutions,
                status.ready,
                status.in_flight
            );
            outcome
        }
        Directive::Halted => CycleOutcome::Halted,
        Directive::None => CycleOutcome::Idle,
    }
}
