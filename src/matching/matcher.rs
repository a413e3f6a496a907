//! First-fit matcher
//!
//! Scans the roster in order and returns the first acceptable pilot or drone.
//! Every rejected candidate met before the winner is assessed individually, so
//! a long roster of near-misses produces one warning per near-miss.

use super::filters::{assess_drone, assess_pilot, DroneVerdict, PilotVerdict};
use super::MatchPolicy;
use crate::pipeline::events::{DispatchEvent, EventSink};
use crate::types::{Drone, Mission, Pilot};
use tracing::debug;

/// A roster entry chosen by the matcher, with its position in the roster.
#[derive(Debug)]
pub struct Candidate<'a, T> {
    pub index: usize,
    pub record: &'a T,
}

impl<T> Clone for Candidate<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Candidate<'_, T> {}

/// Pilot and drone selection for a single mission.
pub struct Matcher<'p> {
    policy: &'p MatchPolicy,
}

impl<'p> Matcher<'p> {
    pub fn new(policy: &'p MatchPolicy) -> Self {
        Self { policy }
    }

    /// First `Available` pilot with the required skill and certification.
    ///
    /// Emits `CertificationMismatch` for each skilled-but-uncertified pilot
    /// passed over. Missing-skill rejections are silent.
    pub fn find_pilot<'a>(
        &self,
        mission: &Mission,
        pilots: &'a [Pilot],
        sink: &mut dyn EventSink,
    ) -> Option<Candidate<'a, Pilot>> {
        for (index, pilot) in pilots.iter().enumerate() {
            match assess_pilot(pilot, mission) {
                PilotVerdict::Eligible => {
                    debug!(mission = %mission.project_id, pilot = %pilot.name, "Pilot accepted");
                    return Some(Candidate { index, record: pilot });
                }
                PilotVerdict::CertificationMismatch => {
                    sink.emit(DispatchEvent::CertificationMismatch {
                        mission: mission.project_id.clone(),
                        pilot: pilot.name.clone(),
                        required: mission.required_certification.clone(),
                    });
                }
                PilotVerdict::NotAvailable | PilotVerdict::MissingSkill => {}
            }
        }
        None
    }

    /// First `Available` drone fit for the forecast.
    ///
    /// Emits `WeatherRisk` for each available drone rejected for rain.
    pub fn find_drone<'a>(
        &self,
        mission: &Mission,
        drones: &'a [Drone],
        sink: &mut dyn EventSink,
    ) -> Option<Candidate<'a, Drone>> {
        for (index, drone) in drones.iter().enumerate() {
            match assess_drone(drone, mission, self.policy) {
                DroneVerdict::Eligible => {
                    debug!(
                        mission = %mission.project_id,
                        drone = %drone.drone_id,
                        "Drone accepted"
                    );
                    return Some(Candidate { index, record: drone });
                }
                DroneVerdict::WeatherRisk => {
                    sink.emit(DispatchEvent::WeatherRisk {
                        mission: mission.project_id.clone(),
                        drone: drone.drone_id.clone(),
                        forecast: mission.weather_forecast.clone(),
                    });
                }
                DroneVerdict::NotAvailable => {}
            }
        }
        None
    }

    /// Fallback for urgent missions when `find_pilot` found nobody.
    ///
    /// Returns the first pilot whose status is `Assigned`, skipping every
    /// skill, certification and location check. The pilot keeps its previous
    /// assignment; nothing backfills the mission it is pulled from.
    pub fn handle_urgent<'a>(
        &self,
        mission: &Mission,
        pilots: &'a [Pilot],
        sink: &mut dyn EventSink,
    ) -> Option<Candidate<'a, Pilot>> {
        if !mission.priority.is_urgent() {
            return None;
        }
        if !self.policy.urgent_reassignment {
            debug!(mission = %mission.project_id, "Urgent reassignment disabled by policy");
            return None;
        }

        sink.emit(DispatchEvent::UrgentFallback {
            mission: mission.project_id.clone(),
        });

        let (index, pilot) = pilots
            .iter()
            .enumerate()
            .find(|(_, p)| p.status.is_assigned())?;

        sink.emit(DispatchEvent::UrgentReassignment {
            mission: mission.project_id.clone(),
            pilot: pilot.name.clone(),
            previous_assignment: pilot.current_assignment.clone(),
        });
        Some(Candidate { index, record: pilot })
    }
}
