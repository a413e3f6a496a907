//! Dispatch Configuration - workbook location, matching policy and ledger
//!
//! Every section implements `Default` with the values the matcher has always
//! used, so a missing config file changes nothing.

use super::defaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an assignment deployment.
///
/// Load with `DispatchConfig::load()` which searches:
/// 1. `$SKYROSTER_CONFIG` env var
/// 2. `./dispatch_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Where the roster worksheets live
    #[serde(default)]
    pub roster: RosterConfig,

    /// Matching rules that are deployment-specific
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Run history
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl DispatchConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SKYROSTER_CONFIG` environment variable
    /// 2. `./dispatch_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(
                            path = %p.display(),
                            "Loaded dispatch config from {}",
                            defaults::CONFIG_ENV
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from {}, falling back",
                            defaults::CONFIG_ENV
                        );
                    }
                }
            } else {
                warn!(
                    path = %path,
                    "{} points to non-existent file, falling back",
                    defaults::CONFIG_ENV
                );
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dispatch config from ./{}", defaults::CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; they never fail the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config as TOML, e.g. a starter file from `init-config`.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Dispatch config saved");
        Ok(())
    }

    /// Check the config for values the matcher cannot work with.
    ///
    /// Rules:
    /// - Worksheet file names are non-empty and distinct
    /// - Policy tags are non-empty
    /// - An enabled ledger has a path
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let r = &self.roster;

        let files = [
            ("roster.pilots_file", &r.pilots_file),
            ("roster.drones_file", &r.drones_file),
            ("roster.missions_file", &r.missions_file),
        ];
        for (name, value) in files {
            Self::check_non_empty(value, name, &mut errors);
        }
        for (i, (name_a, a)) in files.iter().enumerate() {
            for (name_b, b) in &files[i + 1..] {
                if !a.trim().is_empty() && a.trim() == b.trim() {
                    errors.push(format!("{name_a} and {name_b} both point to '{a}'"));
                }
            }
        }

        Self::check_non_empty(&self.policy.rainy_forecast, "policy.rainy_forecast", &mut errors);
        Self::check_non_empty(&self.policy.rain_capability, "policy.rain_capability", &mut errors);

        if self.ledger.enabled && self.ledger.path.as_os_str().is_empty() {
            errors.push("ledger.path: must be set when the ledger is enabled".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_non_empty(value: &str, name: &str, errors: &mut Vec<String>) {
        if value.trim().is_empty() {
            errors.push(format!("{name}: must not be empty"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({path}): {1}", path = .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({path}): {1}", path = .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Roster
// ============================================================================

/// Location of the CSV roster workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub data_dir: PathBuf,
    pub pilots_file: String,
    pub drones_file: String,
    pub missions_file: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DEFAULT_DATA_DIR),
            pilots_file: defaults::PILOTS_FILE.to_string(),
            drones_file: defaults::DRONES_FILE.to_string(),
            missions_file: defaults::MISSIONS_FILE.to_string(),
        }
    }
}

// ============================================================================
// Policy
// ============================================================================

/// Matching rules that vary between deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Forecast label that triggers the rain screen
    pub rainy_forecast: String,
    /// Tag a drone's weather resistance must carry for rainy missions
    pub rain_capability: String,
    /// Pull an already-assigned pilot onto urgent missions nobody else can fly
    pub urgent_reassignment: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rainy_forecast: defaults::RAINY_FORECAST.to_string(),
            rain_capability: defaults::RAIN_CAPABILITY.to_string(),
            urgent_reassignment: true,
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(defaults::DEFAULT_LEDGER_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = DispatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy.rainy_forecast, "Rainy");
        assert!(config.policy.urgent_reassignment);
        assert_eq!(config.roster.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: DispatchConfig = toml::from_str(
            r#"
            [policy]
            urgent_reassignment = false
            "#,
        )
        .unwrap();
        assert!(!config.policy.urgent_reassignment);
        assert_eq!(config.policy.rain_capability, "Rain");
        assert_eq!(config.roster, RosterConfig::default());
        assert!(config.ledger.enabled);
    }

    #[test]
    fn test_validate_rejects_duplicate_and_empty_files() {
        let mut config = DispatchConfig::default();
        config.roster.drones_file = config.roster.pilots_file.clone();
        config.roster.missions_file = String::new();

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.contains("roster.missions_file")));
                assert!(errors.iter().any(|e| e.contains("both point to")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_policy_tags() {
        let mut config = DispatchConfig::default();
        config.policy.rain_capability = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dispatch_config.toml");
        let mut config = DispatchConfig::default();
        config.policy.rainy_forecast = "Monsoon".into();
        config.ledger.enabled = false;

        config.save_to_file(&path).unwrap();
        let loaded = DispatchConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[policy\nrainy_forecast = ").unwrap();
        let err = DispatchConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
        assert!(err.to_string().contains("broken.toml"));
    }
}
