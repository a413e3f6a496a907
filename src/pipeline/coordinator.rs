//! Assignment Coordinator - per-mission decision sequence
//!
//! Missions are processed one at a time, in store order:
//!
//! ```text
//! STEP 1: Find pilot (first fit), falling back to urgent reassignment
//! STEP 2: Find drone (always runs, even without a pilot)
//! STEP 3: No pilot        -> NO_PILOT
//! STEP 4: No drone        -> NO_DRONE
//! STEP 5: Cost > budget   -> BUDGET_EXCEEDED
//! STEP 6: Location check  (warning only)
//! STEP 7: Commit pilot + drone as Assigned, write back to the store
//! STEP 8: Report success
//! ```
//!
//! The order is observable through the event stream and must not change.
//! No mission outcome aborts the batch; only a failure to load the roster
//! does.

use super::events::{DispatchEvent, EventSink};
use super::outcome::{MissionOutcome, RunReport, Terminal};
use crate::matching::{mission_cost, MatchPolicy, Matcher};
use crate::storage::{RecordStore, StoreError};
use crate::types::{Amount, Mission, Roster, Status};
use chrono::Utc;
use tracing::{debug, error, info};

/// Runs the assignment sequence over every mission in a store.
pub struct AssignmentCoordinator<'s, S: RecordStore + ?Sized, E: EventSink> {
    store: &'s mut S,
    sink: E,
    policy: MatchPolicy,
    dry_run: bool,
}

impl<'s, S: RecordStore + ?Sized, E: EventSink> AssignmentCoordinator<'s, S, E> {
    pub fn new(store: &'s mut S, sink: E, policy: MatchPolicy) -> Self {
        Self {
            store,
            sink,
            policy,
            dry_run: false,
        }
    }

    /// Label the run as a dry run in its report. The caller is responsible
    /// for handing in a store whose writes go nowhere.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn into_sink(self) -> E {
        self.sink
    }

    /// Process every mission once, in order.
    ///
    /// Pilots and drones are loaded once into a working roster; each commit
    /// updates that roster so later missions see earlier assignments.
    pub fn run(&mut self) -> Result<RunReport, StoreError> {
        let started_at = Utc::now();
        let backend = self.store.backend_name();

        let missions = self.store.list_missions()?;
        let mut roster = Roster::new(self.store.list_pilots()?, self.store.list_drones()?);

        info!(
            backend,
            missions = missions.len(),
            pilots = roster.pilots.len(),
            drones = roster.drones.len(),
            available_pilots = roster.available_pilots(),
            available_drones = roster.available_drones(),
            dry_run = self.dry_run,
            "Assignment run starting"
        );

        let outcomes: Vec<MissionOutcome> = missions
            .iter()
            .map(|mission| self.process_mission(mission, &mut roster))
            .collect();

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            backend: backend.to_string(),
            dry_run: self.dry_run,
            outcomes,
        };
        info!(summary = %report, "Assignment run finished");
        Ok(report)
    }

    /// Run the decision sequence for one mission against `roster`.
    pub fn process_mission(&mut self, mission: &Mission, roster: &mut Roster) -> MissionOutcome {
        let mission_id = mission.project_id.as_str();
        let mut recorder = Recorder {
            sink: &mut self.sink,
            events: Vec::new(),
        };
        let matcher = Matcher::new(&self.policy);

        recorder.emit(DispatchEvent::CheckingMission {
            mission: mission_id.to_string(),
        });

        // Steps 1-2
        let mut reassigned = false;
        let pilot = match matcher.find_pilot(mission, &roster.pilots, &mut recorder) {
            Some(found) => Some(found),
            None => {
                let fallback = matcher.handle_urgent(mission, &roster.pilots, &mut recorder);
                reassigned = fallback.is_some();
                fallback
            }
        };
        let drone = matcher.find_drone(mission, &roster.drones, &mut recorder);

        let pilot_name = pilot.map(|c| c.record.name.clone());
        let drone_id = drone.map(|c| c.record.drone_id.clone());

        // Step 3
        let Some(pilot) = pilot else {
            recorder.emit(DispatchEvent::NoPilotAvailable {
                mission: mission_id.to_string(),
            });
            return recorder
                .into_outcome(mission_id, Terminal::NoPilot, None, drone_id, None, false);
        };

        // Step 4
        let Some(drone) = drone else {
            recorder.emit(DispatchEvent::NoDroneAvailable {
                mission: mission_id.to_string(),
            });
            return recorder.into_outcome(
                mission_id,
                Terminal::NoDrone,
                pilot_name,
                None,
                None,
                reassigned,
            );
        };

        // Step 5
        let cost = mission_cost(mission, pilot.record);
        if cost > mission.mission_budget {
            recorder.emit(DispatchEvent::BudgetExceeded {
                mission: mission_id.to_string(),
                required: cost,
                budget: mission.mission_budget,
            });
            return recorder.into_outcome(
                mission_id,
                Terminal::BudgetExceeded,
                pilot_name,
                drone_id,
                Some(cost),
                reassigned,
            );
        }

        // Step 6
        if pilot.record.location.trim() != mission.location.trim() {
            recorder.emit(DispatchEvent::LocationMismatch {
                mission: mission_id.to_string(),
                pilot: pilot.record.name.clone(),
                pilot_location: pilot.record.location.clone(),
                mission_location: mission.location.clone(),
            });
        }

        // Step 7
        let (pilot_index, drone_index) = (pilot.index, drone.index);
        let pilot_name = pilot.record.name.clone();
        let drone_id = drone.record.drone_id.clone();

        roster.assign_pilot(pilot_index, mission_id);
        roster.assign_drone(drone_index, mission_id);
        let persisted = commit(&mut *self.store, mission_id, &pilot_name, &drone_id);

        // Step 8
        recorder.emit(DispatchEvent::PilotAssigned {
            mission: mission_id.to_string(),
            pilot: pilot_name.clone(),
        });
        recorder.emit(DispatchEvent::DroneAssigned {
            mission: mission_id.to_string(),
            drone: drone_id.clone(),
        });

        let mut outcome = recorder.into_outcome(
            mission_id,
            Terminal::Assigned,
            Some(pilot_name),
            Some(drone_id),
            Some(cost),
            reassigned,
        );
        outcome.persisted = persisted;
        outcome
    }
}

/// Write both assignments through to the store.
///
/// A failed write is logged and reported as `false`; it never stops the run.
fn commit<S: RecordStore + ?Sized>(
    store: &mut S,
    mission_id: &str,
    pilot: &str,
    drone: &str,
) -> bool {
    let mut persisted = true;
    if let Err(e) = store.update_pilot_status(pilot, &Status::Assigned, mission_id) {
        error!(
            mission = %mission_id,
            pilot = %pilot,
            error = %e,
            "Failed to persist pilot assignment"
        );
        persisted = false;
    }
    if let Err(e) = store.update_drone_status(drone, &Status::Assigned, mission_id) {
        error!(
            mission = %mission_id,
            drone = %drone,
            error = %e,
            "Failed to persist drone assignment"
        );
        persisted = false;
    }
    debug!(mission = %mission_id, persisted, "Assignment committed");
    persisted
}

/// Forwards events to the run's sink and keeps a copy for the outcome.
struct Recorder<'a, E: EventSink> {
    sink: &'a mut E,
    events: Vec<DispatchEvent>,
}

impl<E: EventSink> Recorder<'_, E> {
    fn into_outcome(
        self,
        mission: &str,
        terminal: Terminal,
        pilot: Option<String>,
        drone: Option<String>,
        cost: Option<Amount>,
        reassigned: bool,
    ) -> MissionOutcome {
        MissionOutcome {
            mission: mission.to_string(),
            terminal,
            pilot,
            drone,
            cost,
            reassigned,
            persisted: false,
            events: self.events,
        }
    }
}

impl<E: EventSink> EventSink for Recorder<'_, E> {
    fn emit(&mut self, event: DispatchEvent) {
        self.events.push(event.clone());
        self.sink.emit(event);
    }
}
