//! Phase sequence loading
//!
//! Phase sequences are described in TOML files as a `[[phase]]` list:
//!
//! ```toml
//! [[phase]]
//! title = "Warm-up"
//! duration_secs = 30.0
//!
//! [[phase]]
//! title = "Work"
//! duration_ms = 90000
//! action_label = "Go"
//! ```
//!
//! Each entry gives its duration as either `duration_secs` (fractional,
//! rounded to milliseconds) or `duration_ms`, but never both.

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;
use tempo_types::Phase;

use crate::error::TimerError;

/// A parsed phase sequence plus its per-phase display labels
#[derive(Debug, Clone, Default)]
pub struct PhaseSet {
    /// Ordered phases, ready for `TimerEngine::new`
    pub phases: Vec<Phase>,

    /// Action labels by phase index, ready for `with_action_labels`
    pub action_labels: HashMap<usize, String>,
}

/// One `[[phase]]` entry as written in config
#[derive(Debug, Clone, Deserialize)]
struct PhaseConfig {
    #[serde(default)]
    title: Option<String>,

    /// Duration in fractional seconds (alternative to `duration_ms`)
    #[serde(default)]
    duration_secs: Option<f64>,

    /// Duration in milliseconds (alternative to `duration_secs`)
    #[serde(default)]
    duration_ms: Option<u64>,

    /// Display label gating placeholder rendering in views
    #[serde(default)]
    action_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhaseFile {
    #[serde(default, rename = "phase")]
    phases: Vec<PhaseConfig>,
}

/// Load a phase sequence from a TOML file
pub fn load_phases_from_file(path: &Path) -> Result<PhaseSet, TimerError> {
    let content = fs::read_to_string(path).map_err(|e| TimerError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let set = load_phases_from_str(&content)?;
    tracing::debug!(path = %path.display(), phases = set.phases.len(), "Loaded phase sequence");
    Ok(set)
}

/// Parse a phase sequence from TOML text
pub fn load_phases_from_str(content: &str) -> Result<PhaseSet, TimerError> {
    let file: PhaseFile =
        toml::from_str(content).map_err(|e| TimerError::ParseToml { source: e })?;

    if file.phases.is_empty() {
        return Err(TimerError::InvalidDefinition {
            reason: "phase sequence is empty".to_string(),
        });
    }

    let mut phases = Vec::with_capacity(file.phases.len());
    let mut action_labels = HashMap::new();

    for (index, config) in file.phases.into_iter().enumerate() {
        let duration_ms = resolve_duration(index, &config)?;

        phases.push(Phase {
            duration_ms,
            title: config.title,
        });

        if let Some(label) = config.action_label {
            action_labels.insert(index, label);
        }
    }

    Ok(PhaseSet {
        phases,
        action_labels,
    })
}

fn resolve_duration(index: usize, config: &PhaseConfig) -> Result<u64, TimerError> {
    match (config.duration_ms, config.duration_secs) {
        (Some(_), Some(_)) => Err(TimerError::InvalidDefinition {
            reason: format!(
                "phase {} sets both duration_ms and duration_secs",
                index
            ),
        }),
        (Some(ms), None) => Ok(ms),
        (None, Some(secs)) => {
            if !secs.is_finite() || secs < 0.0 {
                return Err(TimerError::InvalidDefinition {
                    reason: format!("phase {} has invalid duration_secs {}", index, secs),
                });
            }
            Ok((secs * 1000.0).round() as u64)
        }
        (None, None) => Err(TimerError::InvalidDefinition {
            reason: format!("phase {} has no duration", index),
        }),
    }
}
