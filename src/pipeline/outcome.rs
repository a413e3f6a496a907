//! Per-mission outcomes and the run report

use super::events::DispatchEvent;
use crate::types::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where processing of a mission stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terminal {
    Assigned,
    NoPilot,
    NoDrone,
    BudgetExceeded,
}

impl Terminal {
    pub fn is_success(self) -> bool {
        self == Terminal::Assigned
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Assigned => write!(f, "ASSIGNED"),
            Terminal::NoPilot => write!(f, "NO_PILOT"),
            Terminal::NoDrone => write!(f, "NO_DRONE"),
            Terminal::BudgetExceeded => write!(f, "BUDGET_EXCEEDED"),
        }
    }
}

/// Result of processing one mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub mission: String,
    pub terminal: Terminal,
    /// Pilot selected, even when a later step failed
    pub pilot: Option<String>,
    pub drone: Option<String>,
    /// Required cost, when a pilot was found
    pub cost: Option<Amount>,
    /// Pilot came from the urgent reassignment fallback
    #[serde(default)]
    pub reassigned: bool,
    /// Commit reached the record store without error
    #[serde(default)]
    pub persisted: bool,
    pub events: Vec<DispatchEvent>,
}

/// Everything one coordinator run decided, in mission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Backend the run read from and committed to
    pub backend: String,
    pub dry_run: bool,
    pub outcomes: Vec<MissionOutcome>,
}

impl RunReport {
    pub fn count(&self, terminal: Terminal) -> usize {
        self.outcomes.iter().filter(|o| o.terminal == terminal).count()
    }

    pub fn assigned(&self) -> usize {
        self.count(Terminal::Assigned)
    }

    pub fn reassigned(&self) -> usize {
        self.outcomes.iter().filter(|o| o.reassigned).count()
    }

    /// Committed assignments whose store write failed.
    pub fn unpersisted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.terminal.is_success() && !o.persisted)
            .count()
    }

    pub fn outcome(&self, mission: &str) -> Option<&MissionOutcome> {
        self.outcomes.iter().find(|o| o.mission == mission)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missions: {} assigned, {} no pilot, {} no drone, {} over budget",
            self.outcomes.len(),
            self.assigned(),
            self.count(Terminal::NoPilot),
            self.count(Terminal::NoDrone),
            self.count(Terminal::BudgetExceeded),
        )?;
        match self.reassigned() {
            0 => Ok(()),
            n => write!(f, " ({n} by urgent reassignment)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(mission: &str, terminal: Terminal, persisted: bool) -> MissionOutcome {
        MissionOutcome {
            mission: mission.into(),
            terminal,
            pilot: None,
            drone: None,
            cost: None,
            reassigned: false,
            persisted,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_report_counts() {
        let now = Utc::now();
        let report = RunReport {
            started_at: now,
            finished_at: now,
            backend: "InMemory".into(),
            dry_run: false,
            outcomes: vec![
                outcome("A", Terminal::Assigned, true),
                outcome("B", Terminal::Assigned, false),
                outcome("C", Terminal::NoDrone, false),
                outcome("D", Terminal::BudgetExceeded, false),
            ],
        };
        assert_eq!(report.assigned(), 2);
        assert_eq!(report.unpersisted(), 1);
        assert_eq!(report.count(Terminal::NoPilot), 0);
        assert_eq!(report.outcome("C").map(|o| o.terminal), Some(Terminal::NoDrone));
        assert_eq!(
            report.to_string(),
            "4 missions: 2 assigned, 0 no pilot, 1 no drone, 1 over budget"
        );
    }

    #[test]
    fn test_summary_mentions_reassignments() {
        let now = Utc::now();
        let mut pulled = outcome("M2", Terminal::Assigned, true);
        pulled.reassigned = true;
        let report = RunReport {
            started_at: now,
            finished_at: now,
            backend: "InMemory".into(),
            dry_run: false,
            outcomes: vec![outcome("M1", Terminal::Assigned, true), pulled],
        };
        assert_eq!(report.reassigned(), 1);
        assert_eq!(
            report.to_string(),
            "2 missions: 2 assigned, 0 no pilot, 0 no drone, 0 over budget \
             (1 by urgent reassignment)"
        );
    }

    #[test]
    fn test_terminal_serializes_screaming() {
        let json = serde_json::to_string(&Terminal::BudgetExceeded).unwrap();
        assert_eq!(json, "\"BUDGET_EXCEEDED\"");
    }
}
