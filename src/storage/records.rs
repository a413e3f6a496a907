//! Worksheet row decoding
//!
//! Turns raw worksheet rows into typed `Pilot` / `Drone` / `Mission` records.
//! Every required column is checked here so that a bad row fails the load
//! with a `MalformedRecord` naming the worksheet row and field, instead of
//! surfacing later inside matching.

use super::persistence::StoreError;
use super::sheet::Sheet;
use crate::types::{Amount, Drone, Mission, Pilot, Priority, Status, TagSet};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Column names shared by the decoder and the status writer.
pub mod columns {
    pub const PILOT_NAME: &str = "name";
    pub const PILOT_SKILLS: &str = "skills";
    pub const PILOT_CERTIFICATIONS: &str = "certifications";
    pub const PILOT_LOCATION: &str = "location";
    pub const PILOT_DAILY_RATE: &str = "daily_rate_inr";

    pub const DRONE_ID: &str = "drone_id";
    pub const DRONE_WEATHER_RESISTANCE: &str = "weather_resistance";

    pub const STATUS: &str = "status";
    pub const CURRENT_ASSIGNMENT: &str = "current_assignment";

    pub const MISSION_ID: &str = "project_id";
    pub const MISSION_START: &str = "start_date";
    pub const MISSION_END: &str = "end_date";
    pub const MISSION_SKILL: &str = "required_skills";
    pub const MISSION_CERT: &str = "required_certs";
    pub const MISSION_PRIORITY: &str = "priority";
    pub const MISSION_WEATHER: &str = "weather_forecast";
    pub const MISSION_BUDGET: &str = "mission_budget_inr";
    pub const MISSION_LOCATION: &str = "location";
}

use columns::*;

/// Cursor over one data row of a worksheet.
struct RowReader<'a> {
    sheet: &'a Sheet,
    collection: &'static str,
    index: usize,
}

impl RowReader<'_> {
    /// Line of the worksheet file this row was read from.
    fn row_number(&self) -> usize {
        self.sheet.line_number(self.index)
    }

    fn malformed(&self, field: &str, reason: impl Into<String>) -> StoreError {
        StoreError::malformed(self.collection, self.row_number(), field, reason)
    }

    /// Raw cell; the column must exist, the cell may be empty.
    fn cell(&self, field: &str) -> Result<&str, StoreError> {
        let column = self
            .sheet
            .column(field)
            .ok_or_else(|| self.malformed(field, "column is missing"))?;
        Ok(self.sheet.cell(self.index, column).trim())
    }

    /// Non-empty cell.
    fn required(&self, field: &str) -> Result<String, StoreError> {
        let value = self.cell(field)?;
        if value.is_empty() {
            return Err(self.malformed(field, "is empty"));
        }
        Ok(value.to_string())
    }

    fn optional(&self, field: &str) -> Option<String> {
        let column = self.sheet.column(field)?;
        let value = self.sheet.cell(self.index, column).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn tags(&self, field: &str) -> Result<TagSet, StoreError> {
        Ok(TagSet::parse(self.cell(field)?))
    }

    fn amount(&self, field: &str) -> Result<Amount, StoreError> {
        let raw = self.required(field)?;
        parse_amount(&raw).ok_or_else(|| {
            self.malformed(field, format!("'{raw}' is not a non-negative whole amount"))
        })
    }

    fn date(&self, field: &str) -> Result<NaiveDate, StoreError> {
        let raw = self.required(field)?;
        parse_date(&raw)
            .ok_or_else(|| self.malformed(field, format!("'{raw}' is not a YYYY-MM-DD date")))
    }
}

/// Parse `50000`, `50,000`, `50_000` or `50000.0`. Fractions and negatives
/// are rejected.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if let Ok(v) = cleaned.parse::<Amount>() {
        return Some(v);
    }
    let v: f64 = cleaned.parse().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= Amount::MAX as f64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Some(v as Amount);
    }
    None
}

/// Parse an ISO date, ignoring any `T..` or ` ..` time suffix.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn rows<'a>(sheet: &'a Sheet, collection: &'static str) -> impl Iterator<Item = RowReader<'a>> {
    (0..sheet.rows.len()).map(move |index| RowReader {
        sheet,
        collection,
        index,
    })
}

fn ensure_unique<'a>(
    sheet: &Sheet,
    collection: &'static str,
    field: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(StoreError::malformed(
                collection,
                sheet.line_number(index),
                field,
                format!("duplicates identity '{id}'"),
            ));
        }
    }
    Ok(())
}

pub fn decode_pilots(sheet: &Sheet) -> Result<Vec<Pilot>, StoreError> {
    let pilots = rows(sheet, "pilot")
        .map(|row| -> Result<Pilot, StoreError> {
            Ok(Pilot {
                name: row.required(PILOT_NAME)?,
                status: Status::from(row.required(STATUS)?),
                skills: row.tags(PILOT_SKILLS)?,
                certifications: row.tags(PILOT_CERTIFICATIONS)?,
                location: row.required(PILOT_LOCATION)?,
                daily_rate: row.amount(PILOT_DAILY_RATE)?,
                current_assignment: row.optional(CURRENT_ASSIGNMENT),
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    ensure_unique(sheet, "pilot", PILOT_NAME, pilots.iter().map(|p| p.name.as_str()))?;
    Ok(pilots)
}

pub fn decode_drones(sheet: &Sheet) -> Result<Vec<Drone>, StoreError> {
    let drones = rows(sheet, "drone")
        .map(|row| -> Result<Drone, StoreError> {
            Ok(Drone {
                drone_id: row.required(DRONE_ID)?,
                status: Status::from(row.required(STATUS)?),
                weather_resistance: row.tags(DRONE_WEATHER_RESISTANCE)?,
                current_assignment: row.optional(CURRENT_ASSIGNMENT),
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    ensure_unique(sheet, "drone", DRONE_ID, drones.iter().map(|d| d.drone_id.as_str()))?;
    Ok(drones)
}

pub fn decode_missions(sheet: &Sheet) -> Result<Vec<Mission>, StoreError> {
    let missions = rows(sheet, "mission")
        .map(|row| -> Result<Mission, StoreError> {
            let start_date = row.date(MISSION_START)?;
            let end_date = row.date(MISSION_END)?;
            if end_date < start_date {
                return Err(row.malformed(MISSION_END, "is before start_date"));
            }
            let priority = row
                .required(MISSION_PRIORITY)?
                .parse::<Priority>()
                .map_err(|e| row.malformed(MISSION_PRIORITY, e))?;
            Ok(Mission {
                project_id: row.required(MISSION_ID)?,
                start_date,
                end_date,
                required_skill: row.required(MISSION_SKILL)?,
                required_certification: row.required(MISSION_CERT)?,
                priority,
                weather_forecast: row.required(MISSION_WEATHER)?,
                mission_budget: row.amount(MISSION_BUDGET)?,
                location: row.required(MISSION_LOCATION)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    ensure_unique(
        sheet,
        "mission",
        MISSION_ID,
        missions.iter().map(|m| m.project_id.as_str()),
    )?;
    Ok(missions)
}
