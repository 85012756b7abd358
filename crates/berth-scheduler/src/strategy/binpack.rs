//! Bin-packing placement: fill the busiest node that still fits.

use berth_core::{Node, WorkloadRequest};

use super::PlacementStrategy;
use super::weighted::weigh_nodes;
use crate::error::SchedulingResult;

/// Highest weight first; ties prefer the node already running more workloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinpackStrategy {
    healthiness_factor: i64,
}

impl BinpackStrategy {
    pub fn new(healthiness_factor: i64) -> Self {
        Self { healthiness_factor }
    }
}

impl PlacementStrategy for BinpackStrategy {
    fn name(&self) -> &'static str {
        "binpack"
    }

    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let mut weighted = weigh_nodes(request, &nodes, self.healthiness_factor)?;
        weighted.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then_with(|| b.node.container_count().cmp(&a.node.container_count()))
        });
        Ok(weighted.into_iter().map(|w| w.node).collect())
    }
}
