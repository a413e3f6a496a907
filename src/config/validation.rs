//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! The raw TOML is first parsed into a `toml::Table` and its key tree compared
//! against the known field names; each stray key becomes a warning with a
//! "did you mean?" suggestion. Normal serde deserialization follows, so a
//! typo never breaks an existing config, it just gets ignored loudly.

use std::collections::HashSet;

/// A non-fatal config warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path in `DispatchConfig`.
///
/// Kept by hand in step with dispatch_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [roster]
        "roster",
        "roster.data_dir",
        "roster.pilots_file",
        "roster.drones_file",
        "roster.missions_file",
        // [policy]
        "policy",
        "policy.rainy_forecast",
        "policy.rain_capability",
        "policy.urgent_reassignment",
        // [ledger]
        "ledger",
        "ledger.enabled",
        "ledger.path",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Every dotted key path in a parsed TOML table, sorted.
///
/// `[roster]` with `data_dir = ".."` yields `["roster", "roster.data_dir"]`.
pub fn dotted_keys(root: &toml::Table) -> Vec<String> {
    let mut keys = Vec::new();
    let mut pending = vec![(String::new(), root)];

    while let Some((prefix, table)) = pending.pop() {
        for (name, value) in table {
            let path = match prefix.as_str() {
                "" => name.clone(),
                parent => format!("{parent}.{name}"),
            };
            if let toml::Value::Table(child) = value {
                pending.push((path.clone(), child));
            }
            keys.push(path);
        }
    }

    keys.sort();
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3. Ties go to the alphabetically
/// first key so the suggestion is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every unknown key in a raw TOML string.
///
/// Unparseable input yields no warnings; serde reports the parse error.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(root) = raw_toml.parse::<toml::Table>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    dotted_keys(&root)
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}
