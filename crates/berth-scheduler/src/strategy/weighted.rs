//! Weighted node ranking.
//!
//! Every node large enough for the request gets a weight from its
//! projected CPU and memory utilization (as integer percentages) plus a
//! configurable multiple of its health indicator. Nodes that would go
//! past 100% on either dimension are dropped.

use berth_core::{Node, WorkloadRequest};
use tracing::debug;

use super::PlacementStrategy;
use crate::error::{SchedulingError, SchedulingResult};

/// A node paired with its weight, only alive for one ranking.
#[derive(Debug, Clone, Copy)]
pub(super) struct WeightedNode<'a> {
    pub node: &'a Node,
    pub weight: i64,
}

/// Projected utilization percentage after adding `requested`.
///
/// A zero request scores a flat 100, matching a fully used dimension.
fn usage_score(used: i64, requested: i64, total: i64) -> i64 {
    if requested <= 0 {
        return 100;
    }
    let projected = (i128::from(used) + i128::from(requested)) * 100 / i128::from(total);
    projected.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Weigh every feasible node, in input order.
pub(super) fn weigh_nodes<'a>(
    request: &WorkloadRequest,
    nodes: &[&'a Node],
    healthiness_factor: i64,
) -> SchedulingResult<Vec<WeightedNode<'a>>> {
    let mut weighted = Vec::with_capacity(nodes.len());

    for &node in nodes {
        if !node.can_ever_fit(request) {
            debug!(
                workload = request.id(),
                node = %node.id,
                total_memory = node.total_memory,
                total_cpus = node.total_cpus,
                "node smaller than request, skipping"
            );
            continue;
        }

        let cpu_score = usage_score(node.used_cpus, request.cpu_shares, node.total_cpus);
        let memory_score = usage_score(node.used_memory, request.memory, node.total_memory);

        if cpu_score > 100 || memory_score > 100 {
            debug!(
                workload = request.id(),
                node = %node.id,
                cpu_score,
                memory_score,
                used_cpus = node.used_cpus,
                used_memory = node.used_memory,
                "node lacks free capacity"
            );
            continue;
        }

        let weight = cpu_score
            .saturating_add(memory_score)
            .saturating_add(healthiness_factor.saturating_mul(node.health_indicator));
        debug!(workload = request.id(), node = %node.id, cpu_score, memory_score, weight, "weighed node");
        weighted.push(WeightedNode { node, weight });
    }

    if weighted.is_empty() {
        debug!(
            workload = request.id(),
            nodes = nodes.len(),
            memory = request.memory,
            cpu_shares = request.cpu_shares,
            "no node has room for the request"
        );
        return Err(SchedulingError::NoResourcesAvailable);
    }

    Ok(weighted)
}

/// Least-loaded placement: lowest weight first, spreading workloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedStrategy {
    healthiness_factor: i64,
}

impl WeightedStrategy {
    pub fn new(healthiness_factor: i64) -> Self {
        Self { healthiness_factor }
    }
}

impl PlacementStrategy for WeightedStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let mut weighted = weigh_nodes(request, &nodes, self.healthiness_factor)?;

        // Stable: equal weight and container count keep input order.
        weighted.sort_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| a.node.container_count().cmp(&b.node.container_count()))
        });

        Ok(weighted.into_iter().map(|w| w.node).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_node(id: &str, total_cpus: i64, used_cpus: i64, total_memory: i64, used_memory: i64) -> Node {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            labels: HashMap::new(),
            total_cpus,
            total_memory,
            used_cpus,
            used_memory,
            health_indicator: 0,
            containers: Vec::new(),
            used_ports: Vec::new(),
        }
    }

    fn req(cpu_shares: i64, memory: i64) -> WorkloadRequest {
        WorkloadRequest {
            cpu_shares,
            memory,
            ..Default::default()
        }
    }

    fn ranked_ids(strategy: &WeightedStrategy, request: &WorkloadRequest, nodes: &[Node]) -> Vec<String> {
        strategy
            .rank_and_sort(request, nodes.iter().collect())
            .unwrap()
            .iter()
            .map(|n| n.id.clone())
            .collect()
    }

    #[test]
    fn weight_uses_truncating_integer_arithmetic() {
        let node = make_node("n1", 10, 2, 100, 20);
        let weighted = weigh_nodes(&req(2, 10), &[&node], 7).unwrap();
        assert_eq!(weighted.len(), 1);
        assert_eq!(weighted[0].weight, 40 + 30);

        let node = make_node("n2", 3, 0, 3, 1);
        let weighted = weigh_nodes(&req(1, 1), &[&node], 0).unwrap();
        // 1*100/3 = 33, 2*100/3 = 66
        assert_eq!(weighted[0].weight, 99);
    }

    #[test]
    fn zero_request_scores_one_hundred() {
        let node = make_node("n1", 10, 9, 100, 99);
        let weighted = weigh_nodes(&req(0, 0), &[&node], 0).unwrap();
        assert_eq!(weighted[0].weight, 200);
    }

    #[test]
    fn health_term_is_scaled_and_unclamped() {
        let mut node = make_node("n1", 10, 0, 100, 0);
        node.health_indicator = 50;
        let weighted = weigh_nodes(&req(1, 10), &[&node], -3).unwrap();
        assert_eq!(weighted[0].weight, 10 + 10 - 150);
    }

    #[test]
    fn excludes_nodes_smaller_than_request() {
        let small = make_node("small", 1, 0, 1000, 0);
        let ok = make_node("ok", 4, 0, 1000, 0);
        let ranked = ranked_ids(&WeightedStrategy::new(0), &req(2, 10), &[small, ok]);
        assert_eq!(ranked, vec!["ok"]);
    }

    #[test]
    fn excludes_nodes_that_would_overflow_usage() {
        let busy = make_node("busy", 10, 9, 100, 0);
        let exact = make_node("exact", 10, 8, 100, 90);
        let ranked = ranked_ids(&WeightedStrategy::new(0), &req(2, 10), &[busy, exact]);
        assert_eq!(ranked, vec!["exact"]);
    }

    #[test]
    fn no_capacity_is_an_error() {
        let nodes = vec![make_node("a", 10, 0, 5, 0), make_node("b", 10, 0, 8, 0)];
        let err = WeightedStrategy::new(0)
            .rank_and_sort(&req(1, 10), nodes.iter().collect())
            .unwrap_err();
        assert_eq!(err, SchedulingError::NoResourcesAvailable);
    }

    #[test]
    fn sorts_least_loaded_first() {
        let nodes = vec![
            make_node("full", 10, 7, 100, 70),
            make_node("empty", 10, 0, 100, 0),
            make_node("half", 10, 4, 100, 40),
        ];
        let ranked = ranked_ids(&WeightedStrategy::new(0), &req(1, 10), &nodes);
        assert_eq!(ranked, vec!["empty", "half", "full"]);
    }

    #[test]
    fn ties_break_on_fewer_containers_then_input_order() {
        let mut busy = make_node("busy", 10, 0, 100, 0);
        busy.containers = vec!["x".into(), "y".into()];
        let mut quiet = make_node("quiet", 10, 0, 100, 0);
        quiet.containers = vec!["x".into()];
        let first = make_node("first", 10, 0, 100, 0);
        let second = make_node("second", 10, 0, 100, 0);

        let ranked = ranked_ids(&WeightedStrategy::new(0), &req(1, 10), &[busy, quiet, first, second]);
        assert_eq!(ranked, vec!["first", "second", "quiet", "busy"]);
    }

    #[test]
    fn large_healthiness_factor_can_invert_order() {
        let mut loaded_but_healthy = make_node("healthy", 10, 8, 100, 80);
        loaded_but_healthy.health_indicator = 10;
        let idle_but_sick = make_node("sick", 10, 0, 100, 0);

        let ranked = ranked_ids(
            &WeightedStrategy::new(-100),
            &req(1, 10),
            &[idle_but_sick, loaded_but_healthy],
        );
        assert_eq!(ranked, vec!["healthy", "sick"]);
    }

    #[test]
    fn extreme_values_do_not_panic() {
        let mut node = make_node("huge", i64::MAX, i64::MAX - 1, i64::MAX, 0);
        node.health_indicator = i64::MAX;
        let weighted = weigh_nodes(&req(1, 1), &[&node], i64::MAX).unwrap();
        assert_eq!(weighted[0].weight, i64::MAX);
    }
}
