//! Dispatch events and reporting sinks
//!
//! Every decision the engine makes is surfaced as a [`DispatchEvent`]. The
//! category of each event and the order events appear in for a mission are
//! stable; the rendered text is for humans only.

use crate::types::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Reporting category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Info,
    Warning,
    Success,
    Failure,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Info => write!(f, "INFO"),
            EventCategory::Warning => write!(f, "WARN"),
            EventCategory::Success => write!(f, "OK"),
            EventCategory::Failure => write!(f, "FAIL"),
        }
    }
}

/// A single observable step in processing a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DispatchEvent {
    /// Processing of a mission has started
    CheckingMission { mission: String },

    /// Pilot has the required skill but lacks the certification
    CertificationMismatch {
        mission: String,
        pilot: String,
        required: String,
    },

    /// Drone lacks rain resistance for a rainy forecast
    WeatherRisk {
        mission: String,
        drone: String,
        forecast: String,
    },

    /// No eligible pilot on an urgent mission; reassignment is being tried
    UrgentFallback { mission: String },

    /// A busy pilot was pulled onto an urgent mission
    UrgentReassignment {
        mission: String,
        pilot: String,
        previous_assignment: Option<String>,
    },

    /// Pilot is based elsewhere; assignment still proceeds
    LocationMismatch {
        mission: String,
        pilot: String,
        pilot_location: String,
        mission_location: String,
    },

    PilotAssigned { mission: String, pilot: String },

    DroneAssigned { mission: String, drone: String },

    NoPilotAvailable { mission: String },

    NoDroneAvailable { mission: String },

    BudgetExceeded {
        mission: String,
        required: Amount,
        budget: Amount,
    },
}

impl DispatchEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            DispatchEvent::CheckingMission { .. } => EventCategory::Info,
            DispatchEvent::CertificationMismatch { .. }
            | DispatchEvent::WeatherRisk { .. }
            | DispatchEvent::UrgentFallback { .. }
            | DispatchEvent::UrgentReassignment { .. }
            | DispatchEvent::LocationMismatch { .. } => EventCategory::Warning,
            DispatchEvent::PilotAssigned { .. } | DispatchEvent::DroneAssigned { .. } => {
                EventCategory::Success
            }
            DispatchEvent::NoPilotAvailable { .. }
            | DispatchEvent::NoDroneAvailable { .. }
            | DispatchEvent::BudgetExceeded { .. } => EventCategory::Failure,
        }
    }

    /// Mission the event belongs to.
    pub fn mission(&self) -> &str {
        match self {
            DispatchEvent::CheckingMission { mission }
            | DispatchEvent::CertificationMismatch { mission, .. }
            | DispatchEvent::WeatherRisk { mission, .. }
            | DispatchEvent::UrgentFallback { mission }
            | DispatchEvent::UrgentReassignment { mission, .. }
            | DispatchEvent::LocationMismatch { mission, .. }
            | DispatchEvent::PilotAssigned { mission, .. }
            | DispatchEvent::DroneAssigned { mission, .. }
            | DispatchEvent::NoPilotAvailable { mission }
            | DispatchEvent::NoDroneAvailable { mission }
            | DispatchEvent::BudgetExceeded { mission, .. } => mission,
        }
    }
}

impl fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchEvent::CheckingMission { mission } => write!(f, "Checking mission {mission}"),
            DispatchEvent::CertificationMismatch { pilot, required, .. } => {
                write!(f, "Certification mismatch: {pilot} (needs {required})")
            }
            DispatchEvent::WeatherRisk { drone, forecast, .. } => {
                write!(f, "Weather risk: {drone} is not rated for {forecast}")
            }
            DispatchEvent::UrgentFallback { mission } => {
                write!(f, "Urgent mission {mission}: trying reassignment")
            }
            DispatchEvent::UrgentReassignment {
                pilot,
                previous_assignment,
                ..
            } => match previous_assignment {
                Some(prev) => write!(f, "Reassigning pilot: {pilot} (was on {prev})"),
                None => write!(f, "Reassigning pilot: {pilot}"),
            },
            DispatchEvent::LocationMismatch {
                pilot,
                pilot_location,
                mission_location,
                ..
            } => write!(
                f,
                "Location mismatch: {pilot} is in {pilot_location}, \
                 mission is in {mission_location}"
            ),
            DispatchEvent::PilotAssigned { pilot, .. } => write!(f, "Assigning pilot: {pilot}"),
            DispatchEvent::DroneAssigned { drone, .. } => write!(f, "Assigning drone: {drone}"),
            DispatchEvent::NoPilotAvailable { .. } => write!(f, "No pilot available"),
            DispatchEvent::NoDroneAvailable { .. } => write!(f, "No drone available"),
            DispatchEvent::BudgetExceeded {
                required, budget, ..
            } => write!(f, "Budget exceeded: requires {required}, budget {budget}"),
        }
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Receiver for dispatch events.
pub trait EventSink {
    fn emit(&mut self, event: DispatchEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: DispatchEvent) {
        (**self).emit(event);
    }
}

/// Writes events to the `tracing` subscriber.
///
/// Info and success map to `info!`, warnings to `warn!`, failures to `error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: DispatchEvent) {
        let mission = event.mission();
        match event.category() {
            EventCategory::Info | EventCategory::Success => {
                info!(mission = %mission, category = %event.category(), "{}", event);
            }
            EventCategory::Warning => {
                warn!(mission = %mission, "{}", event);
            }
            EventCategory::Failure => {
                error!(mission = %mission, "{}", event);
            }
        }
    }
}

/// Collects events in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<DispatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DispatchEvent] {
        &self.events
    }

    pub fn categories(&self) -> Vec<EventCategory> {
        self.events.iter().map(DispatchEvent::category).collect()
    }

    pub fn count(&self, category: EventCategory) -> usize {
        self.events.iter().filter(|e| e.category() == category).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: DispatchEvent) {
        self.events.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DispatchEvent) {}
}
