//! Skyroster: pilot and drone assignment for field missions
//!
//! Reads a roster of pilots, a drone fleet and a mission list, and for each
//! mission in turn picks the first eligible pilot and drone, screens the pair
//! for budget and location, and writes the assignment back.
//!
//! ## Architecture
//!
//! - **Matching**: pure eligibility filters, first-fit scanners, cost
//! - **Pipeline**: the per-mission coordinator and its event stream
//! - **Storage**: `RecordStore` backends (in-memory, CSV workbook), run
//!   ledger, run lock
//! - **Config**: TOML dispatch configuration

pub mod config;
pub mod matching;
pub mod pipeline;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::DispatchConfig;

// Re-export domain types
pub use types::{Amount, Drone, Mission, Pilot, Priority, Roster, Status, TagSet};

// Re-export matching
pub use matching::{MatchPolicy, Matcher};

// Re-export the pipeline
pub use pipeline::{
    AssignmentCoordinator, DispatchEvent, EventCategory, EventLog, EventSink, MissionOutcome,
    RunReport, Terminal, TracingSink,
};

// Re-export storage
pub use storage::{AssignmentLedger, CsvWorkbook, InMemoryStore, RecordStore, StoreError};
