//! Port filter: drops nodes where a requested host port is taken.

use berth_core::{Node, WorkloadRequest};

use super::Filter;
use crate::error::SchedulingResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct PortFilter;

impl Filter for PortFilter {
    fn name(&self) -> &'static str {
        "port"
    }

    fn filter<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
        _enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>> {
        if request.ports.is_empty() {
            return Ok(nodes);
        }
        Ok(nodes
            .into_iter()
            .filter(|node| !request.ports.iter().any(|p| node.used_ports.contains(p)))
            .collect())
    }

    fn get_filters(&self, request: &WorkloadRequest) -> SchedulingResult<Vec<String>> {
        Ok(request.ports.iter().map(|p| format!("port=={p}")).collect())
    }
}
