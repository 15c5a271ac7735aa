//! Exporter config file parser.
//!
//! The file carries static data operators maintain by hand: the named
//! activities to count and the incident statuses to query. Everything
//! else comes from CLI flags.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Incident statuses queried when the config file does not list any.
pub const DEFAULT_INCIDENT_STATUSES: [&str; 3] = ["open", "deleted", "resolved"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExporterFile {
    pub incident_statuses: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Vec<ActivityConfig>,
}

/// One activity whose historic instance count is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// BPMN activity id, e.g. `StartEvent_0l8qdec`.
    pub id: String,
    /// Human-readable name, published as the `activityName` label.
    pub label: String,
    #[serde(alias = "group_key")]
    pub definition_key: String,
}

impl ExporterFile {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let file: ExporterFile = toml::from_str(content)?;
        for activity in &file.activities {
            if activity.id.trim().is_empty() {
                anyhow::bail!("activity entry with empty id (label {:?})", activity.label);
            }
        }
        Ok(file)
    }

    /// Statuses to query, falling back to [`DEFAULT_INCIDENT_STATUSES`].
    pub fn incident_statuses(&self) -> Vec<String> {
        match &self.incident_statuses {
            Some(statuses) => statuses.clone(),
            None => DEFAULT_INCIDENT_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Longest accepted interval.
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 3600);

/// Parse a duration string like "500ms", "30s", "15m", "1h" or "1m30s".
///
/// A bare number is read as seconds. Zero and anything above
/// [`MAX_DURATION`] are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let parsed = match s.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(s)
            .map_err(|e| format!("invalid duration {s:?}: {e} (expected e.g. 500ms, 30s, 15m, 1h30m)"))?,
    };

    if parsed.is_zero() {
        return Err(format!("duration must be greater than zero: {s:?}"));
    }
    if parsed > MAX_DURATION {
        return Err(format!("duration {s:?} exceeds the maximum of 365 days"));
    }
    Ok(parsed)
}
