//! Matching Engine
//!
//! Decides, for one mission at a time, which pilot and which drone can fly it.
//!
//! - **filters**: pure eligibility verdicts for a single candidate
//! - **matcher**: first-fit scans over the roster, plus the urgent fallback
//! - **cost**: mission duration and budget checks
//!
//! The scan is greedy and in roster order. The first acceptable candidate
//! wins; no attempt is made to optimise across missions.

pub mod cost;
pub mod filters;
pub mod matcher;

pub use cost::{mission_cost, mission_days, within_budget};
pub use filters::{
    assess_drone, assess_pilot, is_eligible_drone, is_eligible_pilot, DroneVerdict, PilotVerdict,
};
pub use matcher::{Candidate, Matcher};

use crate::config::{defaults, PolicyConfig};
use serde::{Deserialize, Serialize};

/// Tunables the filters and matcher read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Forecast tag that requires rain-rated drones
    pub rainy_forecast: String,
    /// Weather-resistance tag a drone needs for a rainy forecast
    pub rain_capability: String,
    /// Pull busy pilots onto urgent missions when no one else qualifies
    pub urgent_reassignment: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            rainy_forecast: defaults::RAINY_FORECAST.to_string(),
            rain_capability: defaults::RAIN_CAPABILITY.to_string(),
            urgent_reassignment: true,
        }
    }
}

impl From<&PolicyConfig> for MatchPolicy {
    fn from(cfg: &PolicyConfig) -> Self {
        Self {
            rainy_forecast: cfg.rainy_forecast.clone(),
            rain_capability: cfg.rain_capability.clone(),
            urgent_reassignment: cfg.urgent_reassignment,
        }
    }
}
