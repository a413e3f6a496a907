//! Shared data structures for pilot and drone mission assignment
//!
//! This module defines the typed records the assignment engine works on:
//! - Roster records: `Pilot`, `Drone`
//! - Work items: `Mission`
//! - Small value types: `Status`, `Priority`, `TagSet`, `Amount`
//!
//! Records are produced by a [`RecordStore`](crate::storage::RecordStore) and
//! validated at load time, so the matching code never sees a missing field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency amount in whole units (the roster sheets carry INR).
pub type Amount = u64;

// ============================================================================
// Status
// ============================================================================

/// Availability status of a pilot or drone.
///
/// Roster sheets carry free-form labels such as `On Leave` or `Maintenance`.
/// Anything that is neither `Available` nor `Assigned` is kept verbatim as
/// `Other` and treated as not available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Status {
    #[default]
    Available,
    Assigned,
    Other(String),
}

impl Status {
    pub fn is_available(&self) -> bool {
        matches!(self, Status::Available)
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Status::Assigned)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Available => "Available",
            Status::Assigned => "Assigned",
            Status::Other(label) => label,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Available" => Status::Available,
            "Assigned" => Status::Assigned,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Status::from(raw.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Mission priority. Only `Urgent` changes matching behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub fn is_urgent(self) -> bool {
        self == Priority::Urgent
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "Normal"),
            Priority::Urgent => write!(f, "Urgent"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    /// `Urgent` is matched exactly; any other non-empty label (`High`,
    /// `Standard`, `Normal`, ...) is a normal-priority mission.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("priority is empty".to_string()),
            "Urgent" => Ok(Priority::Urgent),
            _ => Ok(Priority::Normal),
        }
    }
}

// ============================================================================
// TagSet
// ============================================================================

/// Ordered set of tags (skills, certifications, weather capabilities).
///
/// Membership is exact and case-sensitive on trimmed tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for tag in tags {
            set.insert(tag.into());
        }
        set
    }

    /// Parse a comma-separated cell such as `"Mapping, Thermal"`.
    pub fn parse(cell: &str) -> Self {
        Self::new(cell.split(',').map(str::trim).filter(|t| !t.is_empty()))
    }

    pub fn insert(&mut self, tag: String) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

// ============================================================================
// Roster Records
// ============================================================================

/// A pilot on the roster. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub name: String,
    pub status: Status,
    pub skills: TagSet,
    pub certifications: TagSet,
    pub location: String,
    pub daily_rate: Amount,
    /// Mission id stamped on assignment
    #[serde(default)]
    pub current_assignment: Option<String>,
}

/// A drone in the fleet. Identity is `drone_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    pub drone_id: String,
    pub status: Status,
    pub weather_resistance: TagSet,
    #[serde(default)]
    pub current_assignment: Option<String>,
}

/// A mission awaiting a pilot and a drone. Identity is `project_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub project_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub required_skill: String,
    pub required_certification: String,
    pub priority: Priority,
    pub weather_forecast: String,
    pub mission_budget: Amount,
    pub location: String,
}

// ============================================================================
// Roster (in-run working set)
// ============================================================================

/// The pilots and drones a single run matches against.
///
/// Loaded once from the store at the start of a run and mutated as missions
/// are committed, so mission N+1 sees the assignments made for mission N.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub pilots: Vec<Pilot>,
    pub drones: Vec<Drone>,
}

impl Roster {
    pub fn new(pilots: Vec<Pilot>, drones: Vec<Drone>) -> Self {
        Self { pilots, drones }
    }

    pub fn available_pilots(&self) -> usize {
        self.pilots.iter().filter(|p| p.status.is_available()).count()
    }

    pub fn available_drones(&self) -> usize {
        self.drones.iter().filter(|d| d.status.is_available()).count()
    }

    /// Mark the pilot at `index` as assigned to `mission_id`.
    pub fn assign_pilot(&mut self, index: usize, mission_id: &str) {
        if let Some(pilot) = self.pilots.get_mut(index) {
            pilot.status = Status::Assigned;
            pilot.current_assignment = Some(mission_id.to_string());
        }
    }

    /// Mark the drone at `index` as assigned to `mission_id`.
    pub fn assign_drone(&mut self, index: usize, mission_id: &str) {
        if let Some(drone) = self.drones.get_mut(index) {
            drone.status = Status::Assigned;
            drone.current_assignment = Some(mission_id.to_string());
        }
    }
}
