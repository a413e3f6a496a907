//! Assignment Pipeline
//!
//! [`AssignmentCoordinator`] walks the mission list and, for each mission,
//! runs matching, screening and commit in a fixed order. Every decision is
//! reported as a [`DispatchEvent`] to an [`EventSink`] and collected into a
//! [`RunReport`].

mod coordinator;
pub mod events;
mod outcome;

pub use coordinator::AssignmentCoordinator;
pub use events::{DispatchEvent, EventCategory, EventLog, EventSink, NullSink, TracingSink};
pub use outcome::{MissionOutcome, RunReport, Terminal};
