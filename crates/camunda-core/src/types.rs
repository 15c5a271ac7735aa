//! Records returned by the engine REST API.
//!
//! All records are request-scoped: they are decoded, mapped into
//! measurements, and dropped within one collection cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Response of every `.../count` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCount {
    pub count: i64,
}

/// One engine metric interval value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMetric {
    /// Opaque, sortable timestamp of the interval bucket.
    pub timestamp: String,
    pub name: String,
    #[serde(default)]
    pub reporter: Option<String>,
    pub value: i64,
}

/// A deployed process definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessDefinition {
    pub id: String,
    pub key: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub version: i64,
    pub resource: Option<String>,
    pub deployment_id: Option<String>,
    pub tenant_id: Option<String>,
    pub version_tag: Option<String>,
    /// Suspended definitions are never reported on.
    pub suspended: bool,
}

impl fmt::Display for ProcessDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            return f.write_str("<EmptyDefinition>");
        }
        write!(f, "{}@{}", self.key, self.version)
    }
}

/// Instance and failed-job totals for one process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionStatistics {
    pub id: String,
    #[serde(default)]
    pub instances: i64,
    #[serde(default)]
    pub failed_jobs: i64,
    #[serde(default)]
    pub definition: ProcessDefinition,
}

/// Runtime statistics for one activity of a process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistics {
    #[serde(rename = "id")]
    pub activity_id: String,
    #[serde(default)]
    pub instances: i64,
    #[serde(default)]
    pub failed_jobs: i64,
}

/// Historic statistics for one activity of a process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryActivityStatistics {
    #[serde(rename = "id")]
    pub activity_id: String,
    #[serde(default)]
    pub instances: i64,
    #[serde(default)]
    pub canceled: i64,
    #[serde(default)]
    pub finished: i64,
    #[serde(default)]
    pub complete_scope: i64,
}
