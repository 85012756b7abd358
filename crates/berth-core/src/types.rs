//! Domain types read by the placement engine.
//!
//! A [`Node`] is a point-in-time view of one machine as reported by the
//! cluster-state collaborator. A [`WorkloadRequest`] describes what the
//! caller wants to place. Both are plain data: the scheduler only borrows
//! them for the duration of one selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Unique identifier for a node in the cluster.
pub type NodeId = String;

/// Label carrying the workload identifier, used only for log correlation.
pub const WORKLOAD_ID_LABEL: &str = "berth.workload.id";

// ── Node ───────────────────────────────────────────────────────────

/// Capacity, usage and health of a single candidate machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Total CPU shares.
    pub total_cpus: i64,
    /// Total memory in bytes.
    pub total_memory: i64,
    #[serde(default)]
    pub used_cpus: i64,
    #[serde(default)]
    pub used_memory: i64,
    /// Higher is healthier. Supplied by the health monitor.
    #[serde(default)]
    pub health_indicator: i64,
    /// Workloads currently assigned to the node.
    #[serde(default)]
    pub containers: Vec<String>,
    /// Host ports already bound on the node.
    #[serde(default)]
    pub used_ports: Vec<u16>,
}

impl Node {
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Whether the node is large enough to ever host the request,
    /// ignoring what is currently running on it.
    pub fn can_ever_fit(&self, request: &WorkloadRequest) -> bool {
        self.total_memory >= request.memory && self.total_cpus >= request.cpu_shares
    }
}

// ── Workload ───────────────────────────────────────────────────────

/// Resource and placement requirements of the workload being scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadRequest {
    #[serde(default)]
    pub cpu_shares: i64,
    /// Memory in bytes.
    #[serde(default)]
    pub memory: i64,
    /// Constraint expressions such as `zone==east` or `rack!=~5`.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Affinity expressions over workloads already on a node, such as `container==db`.
    #[serde(default)]
    pub affinities: Vec<String>,
    /// Host ports the workload binds.
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl WorkloadRequest {
    /// Identifier used in log fields, `"-"` when the caller did not set one.
    pub fn id(&self) -> &str {
        self.labels
            .get(WORKLOAD_ID_LABEL)
            .map(String::as_str)
            .unwrap_or("-")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        crate::config::load_document(path)
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// A point-in-time list of candidate nodes, as written by operators or
/// exported by the cluster-state collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl ClusterSnapshot {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        crate::config::load_document(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_label_reads_as_empty() {
        let node: Node = toml::from_str(
            r#"
id = "n1"
name = "node-1"
total_cpus = 4
total_memory = 1024
"#,
        )
        .unwrap();

        assert_eq!(node.label("zone"), "");
        assert_eq!(node.used_cpus, 0);
        assert_eq!(node.container_count(), 0);
    }

    #[test]
    fn request_id_falls_back_to_dash() {
        let mut req = WorkloadRequest::default();
        assert_eq!(req.id(), "-");

        req.labels
            .insert(WORKLOAD_ID_LABEL.to_string(), "web-1".to_string());
        assert_eq!(req.id(), "web-1");
    }

    #[test]
    fn can_ever_fit_ignores_usage() {
        let node = Node {
            id: "n1".to_string(),
            name: "node-1".to_string(),
            labels: HashMap::new(),
            total_cpus: 4,
            total_memory: 1024,
            used_cpus: 4,
            used_memory: 1024,
            health_indicator: 0,
            containers: Vec::new(),
            used_ports: Vec::new(),
        };
        let req = WorkloadRequest {
            cpu_shares: 4,
            memory: 1024,
            ..Default::default()
        };
        assert!(node.can_ever_fit(&req));

        let too_big = WorkloadRequest {
            memory: 2048,
            ..req
        };
        assert!(!node.can_ever_fit(&too_big));
    }

    #[test]
    fn snapshot_parses_json() {
        let snapshot: ClusterSnapshot = serde_json::from_str(
            r#"{"nodes":[{"id":"a","name":"a","total_cpus":2,"total_memory":10,"labels":{"zone":"east"}}]}"#,
        )
        .unwrap();

        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.nodes[0].label("zone"), "east");
    }
}
