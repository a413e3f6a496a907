//! System-wide default constants.
//!
//! Values used when `dispatch_config.toml` is absent or leaves a key unset.

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SKYROSTER_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dispatch_config.toml";

// ============================================================================
// Roster Workbook
// ============================================================================

pub const DEFAULT_DATA_DIR: &str = "./data";

pub const PILOTS_FILE: &str = "pilot_roster.csv";

pub const DRONES_FILE: &str = "drone_fleet.csv";

pub const MISSIONS_FILE: &str = "missions.csv";

// ============================================================================
// Matching Policy
// ============================================================================

/// Forecast label that triggers the rain screen on drones.
pub const RAINY_FORECAST: &str = "Rainy";

/// Capability tag a drone needs to fly a rainy mission.
pub const RAIN_CAPABILITY: &str = "Rain";

// ============================================================================
// Ledger
// ============================================================================

pub const DEFAULT_LEDGER_PATH: &str = "./data/assignment_ledger";

/// Runs shown by `skyroster history` when `--limit` is not given.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
