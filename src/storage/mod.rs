//! Roster Storage
//!
//! Where pilots, drones and missions are read from and where assignments are
//! written back, plus the sled ledger of past runs and the run lock.
//!
//! - `persistence`: the [`RecordStore`] trait and the in-memory backend
//! - `workbook`: CSV worksheet backend
//! - `ledger`: sled history of [`RunReport`](crate::pipeline::RunReport)s
//! - `lockfile`: one run per data directory

pub mod ledger;
pub mod lockfile;
pub mod persistence;
pub mod records;
pub mod sheet;
pub mod workbook;

pub use ledger::{AssignmentLedger, LedgerError};
pub use lockfile::ProcessLock;
pub use persistence::{InMemoryStore, RecordStore, StoreError};
pub use workbook::CsvWorkbook;
