//! CSV workbook record store
//!
//! A directory holding one CSV worksheet per collection, laid out like the
//! operations spreadsheet exports:
//!
//! ```text
//! data/
//!   pilot_roster.csv
//!   drone_fleet.csv
//!   missions.csv
//! ```
//!
//! Reads decode the whole worksheet. Status updates rewrite the worksheet in
//! place (temp file + rename), preserving columns this crate does not know
//! about and adding `current_assignment` if the sheet lacks it.

use super::persistence::{RecordStore, StoreError};
use super::records::{self, columns};
use super::sheet::Sheet;
use crate::config::{defaults, RosterConfig};
use crate::types::{Drone, Mission, Pilot, Status};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Record store backed by CSV worksheets in one directory.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
    pilots_file: String,
    drones_file: String,
    missions_file: String,
}

impl CsvWorkbook {
    /// Open a workbook directory using the default worksheet names.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        Self::with_files(
            dir,
            defaults::PILOTS_FILE,
            defaults::DRONES_FILE,
            defaults::MISSIONS_FILE,
        )
    }

    /// Open a workbook directory as described by `[roster]` config.
    pub fn from_config(config: &RosterConfig) -> Result<Self, StoreError> {
        Self::with_files(
            &config.data_dir,
            &config.pilots_file,
            &config.drones_file,
            &config.missions_file,
        )
    }

    /// Open with explicit worksheet file names. All three must exist.
    pub fn with_files<P: AsRef<Path>>(
        dir: P,
        pilots_file: &str,
        drones_file: &str,
        missions_file: &str,
    ) -> Result<Self, StoreError> {
        let workbook = Self {
            dir: dir.as_ref().to_path_buf(),
            pilots_file: pilots_file.to_string(),
            drones_file: drones_file.to_string(),
            missions_file: missions_file.to_string(),
        };

        for file in [pilots_file, drones_file, missions_file] {
            let path = workbook.dir.join(file);
            if !path.is_file() {
                return Err(StoreError::MissingWorksheet(path));
            }
        }

        info!(dir = %workbook.dir.display(), "Workbook opened");
        Ok(workbook)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_sheet(&self, file: &str) -> Result<Sheet, StoreError> {
        let path = self.dir.join(file);
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Sheet::parse(&text))
    }

    fn write_sheet(&self, file: &str, sheet: &Sheet) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!(".{file}.tmp"));
        fs::write(&tmp, sheet.render()).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    /// Rewrite status and current assignment on the first row whose
    /// `id_column` equals `id`. Returns `false` if no row matched.
    fn update_status(
        &self,
        file: &str,
        collection: &'static str,
        id_column: &str,
        id: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<bool, StoreError> {
        let mut sheet = self.read_sheet(file)?;

        let id_col = sheet
            .column(id_column)
            .ok_or_else(|| StoreError::malformed(collection, 1, id_column, "column is missing"))?;
        let Some(row) = sheet.find_row(id_col, id) else {
            debug!(collection, id = %id, "Identity not found in worksheet, update skipped");
            return Ok(false);
        };
        let status_col = sheet.column(columns::STATUS).ok_or_else(|| {
            StoreError::malformed(collection, 1, columns::STATUS, "column is missing")
        })?;
        let assignment_col = sheet.ensure_column(columns::CURRENT_ASSIGNMENT);

        sheet.set_cell(row, status_col, status.as_str());
        sheet.set_cell(row, assignment_col, mission_id);
        self.write_sheet(file, &sheet)?;

        debug!(
            collection,
            id = %id,
            status = %status,
            mission = %mission_id,
            "Worksheet row updated"
        );
        Ok(true)
    }
}

impl RecordStore for CsvWorkbook {
    fn list_pilots(&self) -> Result<Vec<Pilot>, StoreError> {
        records::decode_pilots(&self.read_sheet(&self.pilots_file)?)
    }

    fn list_drones(&self) -> Result<Vec<Drone>, StoreError> {
        records::decode_drones(&self.read_sheet(&self.drones_file)?)
    }

    fn list_missions(&self) -> Result<Vec<Mission>, StoreError> {
        records::decode_missions(&self.read_sheet(&self.missions_file)?)
    }

    fn update_pilot_status(
        &mut self,
        name: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError> {
        self.update_status(
            &self.pilots_file,
            "pilot",
            columns::PILOT_NAME,
            name,
            status,
            mission_id,
        )
        .map(|_| ())
    }

    fn update_drone_status(
        &mut self,
        drone_id: &str,
        status: &Status,
        mission_id: &str,
    ) -> Result<(), StoreError> {
        self.update_status(
            &self.drones_file,
            "drone",
            columns::DRONE_ID,
            drone_id,
            status,
            mission_id,
        )
        .map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "CsvWorkbook"
    }
}
