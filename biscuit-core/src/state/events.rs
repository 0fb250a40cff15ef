//! Control signals and line events
//!
//! Topic names match the event channel the line was first wired to, so a
//! host can route string-named signals onto these types.

/// Control signals that drive motor transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Oven reached temperature, start the belt
    OvenReady,
    /// Pause the belt, keeping everything on it
    MotorPause,
    /// Stop the belt once every biscuit on it has left
    MotorOff,
}

impl Command {
    /// Event channel topic for this signal
    pub const fn topic(self) -> &'static str {
        match self {
            Command::OvenReady => "oven-ready",
            Command::MotorPause => "motor-pause",
            Command::MotorOff => "motor-off",
        }
    }

    /// Parse a signal from its topic name
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "oven-ready" => Some(Command::OvenReady),
            "motor-pause" => Some(Command::MotorPause),
            "motor-off" => Some(Command::MotorOff),
            _ => None,
        }
    }
}

/// Events emitted by the motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Active production cycle (extrude + stamp)
    Pulse,
    /// Drain cycle, oven keeps heating but nothing new enters
    PulseOven,
    /// Final stamp for the biscuit at the stamper, once per drain
    PulseStamper,
    /// Belt is empty and halted
    OvenOff,
}

impl LineEvent {
    /// Event channel topic for this event
    pub const fn topic(self) -> &'static str {
        match self {
            LineEvent::Pulse => "pulse",
            LineEvent::PulseOven => "pulse-oven",
            LineEvent::PulseStamper => "pulse-stamper",
            LineEvent::OvenOff => "oven-off",
        }
    }

    /// Check if this event is routed to stations on the belt
    pub fn is_station_event(&self) -> bool {
        matches!(self, LineEvent::Pulse | LineEvent::PulseStamper)
    }

    /// Check if this event is meant for the oven
    pub fn is_oven_event(&self) -> bool {
        matches!(self, LineEvent::PulseOven | LineEvent::OvenOff)
    }
}
