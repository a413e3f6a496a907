//! RecordStore trait: pluggable roster backend
//!
//! Abstracts where pilots, drones and missions live so the coordinator can run
//! unchanged against different backends:
//! - `InMemoryStore`: in-memory collections for tests and dry runs
//! - `CsvWorkbook`: a directory of CSV worksheets (see `workbook.rs`)

use crate::types::{Drone, Mission, Pilot, Status};
use std::path::PathBuf;

/// Trait for roster backends
///
/// Listing returns records in stored order; the matcher's first-fit scan
/// depends on that order. Status updates address records by identity and
/// treat an unknown identity as a no-op.
pub trait RecordStore {
    fn list_pilots(&self) -> Result<Vec<Pilot>, StoreError>;

    fn list_drones(&self) -> Result<Vec<Drone>, StoreError>;

    fn list_missions(&self) -> Result<Vec<Mission>, StoreError>;

    /// Set a pilot's status and current assignment, by pilot name.
    fn update_pilot_status(
        &mut self,
        name: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError>;

    /// Set a drone's status and current assignment, by drone id.
    fn update_drone_status(
        &mut self,
        drone_id: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("worksheet not found: {}", .0.display())]
    MissingWorksheet(PathBuf),
    #[error("malformed {collection} record (row {row}): '{field}' {reason}")]
    MalformedRecord {
        collection: &'static str,
        row: usize,
        field: String,
        reason: String,
    },
    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn malformed(
        collection: &'static str,
        row: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StoreError::MalformedRecord {
            collection,
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// In-memory roster for testing and dry runs
///
/// Not durable; data is lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pilots: Vec<Pilot>,
    drones: Vec<Drone>,
    missions: Vec<Mission>,
}

impl InMemoryStore {
    pub fn new(pilots: Vec<Pilot>, drones: Vec<Drone>, missions: Vec<Mission>) -> Self {
        Self {
            pilots,
            drones,
            missions,
        }
    }

    /// Copy every collection out of another store.
    ///
    /// Updates applied to the snapshot never reach the source.
    pub fn snapshot(source: &dyn RecordStore) -> Result<Self, StoreError> {
        Ok(Self {
            pilots: source.list_pilots()?,
            drones: source.list_drones()?,
            missions: source.list_missions()?,
        })
    }

    pub fn pilots(&self) -> &[Pilot] {
        &self.pilots
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }
}

impl RecordStore for InMemoryStore {
    fn list_pilots(&self) -> Result<Vec<Pilot>, StoreError> {
        Ok(self.pilots.clone())
    }

    fn list_drones(&self) -> Result<Vec<Drone>, StoreError> {
        Ok(self.drones.clone())
    }

    fn list_missions(&self) -> Result<Vec<Mission>, StoreError> {
        Ok(self.missions.clone())
    }

    fn update_pilot_status(
        &mut self,
        name: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError> {
        if let Some(pilot) = self.pilots.iter_mut().find(|p| p.name == name) {
            pilot.status = status.clone();
            pilot.current_assignment = Some(mission_id.to_string());
        } else {
            tracing::debug!(pilot = %name, "Pilot not found, update skipped");
        }
        Ok(())
    }

    fn update_drone_status(
        &mut self,
        drone_id: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError> {
        if let Some(drone) = self.drones.iter_mut().find(|d| d.drone_id == drone_id) {
            drone.status = status.clone();
            drone.current_assignment = Some(mission_id.to_string());
        } else {
            tracing::debug!(drone = %drone_id, "Drone not found, update skipped");
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagSet;

    fn pilot(name: &str) -> Pilot {
        Pilot {
            name: name.into(),
            status: Status::Available,
            skills: TagSet::parse("Mapping"),
            certifications: TagSet::parse("DGCA"),
            location: "Bangalore".into(),
            daily_rate: 1500,
            current_assignment: None,
        }
    }

    fn drone(id: &str) -> Drone {
        Drone {
            drone_id: id.into(),
            status: Status::Available,
            weather_resistance: TagSet::default(),
            current_assignment: None,
        }
    }

    #[test]
    fn test_in_memory_update_by_identity() {
        let mut store = InMemoryStore::new(
            vec![pilot("Arjun"), pilot("Neha")],
            vec![drone("D001")],
            Vec::new(),
        );
        store
            .update_pilot_status("Neha", &Status::Assigned, "PRJ001")
            .unwrap();
        store
            .update_drone_status("D001", &Status::Assigned, "PRJ001")
            .unwrap();

        let pilots = store.list_pilots().unwrap();
        assert_eq!(pilots[0].status, Status::Available);
        assert_eq!(pilots[1].status, Status::Assigned);
        assert_eq!(pilots[1].current_assignment.as_deref(), Some("PRJ001"));
        assert_eq!(store.drones()[0].current_assignment.as_deref(), Some("PRJ001"));
    }

    #[test]
    fn test_unknown_identity_is_noop() {
        let mut store = InMemoryStore::new(vec![pilot("Arjun")], vec![drone("D001")], Vec::new());
        assert!(store
            .update_pilot_status("Ghost", &Status::Assigned, "PRJ001")
            .is_ok());
        assert!(store
            .update_drone_status("D999", &Status::Assigned, "PRJ001")
            .is_ok());
        assert_eq!(store.pilots()[0].status, Status::Available);
        assert_eq!(store.drones()[0].status, Status::Available);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let source = InMemoryStore::new(vec![pilot("Arjun")], Vec::new(), Vec::new());
        let mut snap = InMemoryStore::snapshot(&source).unwrap();
        snap.update_pilot_status("Arjun", &Status::Assigned, "PRJ001")
            .unwrap();
        assert_eq!(source.pilots()[0].status, Status::Available);
        assert_eq!(snap.pilots()[0].status, Status::Assigned);
    }

    #[test]
    fn test_trait_object() {
        let store: Box<dyn RecordStore> = Box::new(InMemoryStore::default());
        assert_eq!(store.backend_name(), "InMemory");
        assert!(store.list_missions().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_record_message() {
        let err = StoreError::malformed("pilot", 3, "daily_rate_inr", "is not a whole number");
        assert_eq!(
            err.to_string(),
            "malformed pilot record (row 3): 'daily_rate_inr' is not a whole number"
        );
    }
}
