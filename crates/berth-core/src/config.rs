//! scheduler.toml configuration parser.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filter chain used when the config file does not name one.
pub const DEFAULT_FILTERS: &[&str] = &["health", "port", "affinity", "constraint"];

pub const DEFAULT_STRATEGY: &str = "weighted";

/// Health threshold used when the config file does not set one. Admits
/// every node.
pub const DEFAULT_MIN_HEALTH: i64 = i64::MIN;

/// Fixed configuration of a scheduler, read once at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Placement strategy name: "weighted", "spread", "binpack" or "random".
    pub strategy: String,
    /// Filter names, applied in this order.
    pub filters: Vec<String>,
    /// Coefficient applied to a node's health indicator in its weight.
    /// Negative values favour healthier nodes under the weighted strategy.
    pub healthiness_factor: i64,
    /// Nodes below this health indicator are dropped by the health filter.
    /// Defaults to [`DEFAULT_MIN_HEALTH`], which drops nothing.
    pub min_health: i64,
    /// Fixed seed for the random strategy; unset draws from the thread RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            filters: DEFAULT_FILTERS.iter().map(|f| f.to_string()).collect(),
            healthiness_factor: 0,
            min_health: DEFAULT_MIN_HEALTH,
            random_seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Read a TOML document, or JSON when the file ends in `.json`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}
