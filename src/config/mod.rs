//! Dispatch Configuration Module
//!
//! Workbook location, matching policy and ledger settings, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `SKYROSTER_CONFIG` environment variable (path to TOML file)
//! 2. `dispatch_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ```ignore
//! let config = DispatchConfig::load();
//! let policy = MatchPolicy::from(&config.policy);
//! ```

pub mod defaults;
mod dispatch_config;
pub mod validation;

pub use dispatch_config::*;
