//! Assignment Ledger
//!
//! Durable history of coordinator runs. Each [`RunReport`] is stored as JSON
//! in sled, keyed so that iteration order is chronological.

use crate::pipeline::RunReport;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// sled-backed store of past run reports.
#[derive(Clone)]
pub struct AssignmentLedger {
    db: Arc<sled::Db>,
}

impl AssignmentLedger {
    /// Open or create the ledger at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let db = sled::open(path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Append a run report.
    ///
    /// Key: finish time in nanoseconds (u64 big-endian) followed by a sled
    /// generated id, so runs finishing in the same instant stay distinct.
    /// Value: JSON-serialized `RunReport`.
    pub fn record(&self, report: &RunReport) -> Result<(), LedgerError> {
        let nanos = report
            .finished_at
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let mut key = Vec::with_capacity(16);
        key.extend_from_slice(&nanos.to_be_bytes());
        key.extend_from_slice(&self.db.generate_id()?.to_be_bytes());

        let value = serde_json::to_vec(report)?;
        self.db.insert(key, value)?;
        self.db.flush()?;
        debug!(missions = report.outcomes.len(), "Run recorded in ledger");
        Ok(())
    }

    /// The most recent `limit` runs, newest first. Undecodable entries are
    /// skipped.
    pub fn recent(&self, limit: usize) -> Vec<RunReport> {
        let mut reports = Vec::with_capacity(limit.min(self.count()));

        for item in self.db.iter().rev() {
            if reports.len() >= limit {
                break;
            }
            match item {
                Ok((_key, value)) => match serde_json::from_slice::<RunReport>(&value) {
                    Ok(report) => reports.push(report),
                    Err(e) => warn!(error = %e, "Skipping undecodable ledger entry"),
                },
                Err(e) => warn!(error = %e, "Ledger read failed"),
            }
        }

        reports
    }

    pub fn count(&self) -> usize {
        self.db.len()
    }

    pub fn clear(&self) -> Result<(), LedgerError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }
}
