//! Health filter: drops nodes the health monitor considers unfit.

use berth_core::{Node, WorkloadRequest};

use super::Filter;
use crate::error::SchedulingResult;

#[derive(Debug, Clone, Copy)]
pub struct HealthFilter {
    min_health: i64,
}

impl HealthFilter {
    pub fn new(min_health: i64) -> Self {
        Self { min_health }
    }
}

impl Filter for HealthFilter {
    fn name(&self) -> &'static str {
        "health"
    }

    fn filter<'a>(
        &self,
        _request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
        _enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>> {
        Ok(nodes
            .into_iter()
            .filter(|node| node.health_indicator >= self.min_health)
            .collect())
    }
}
