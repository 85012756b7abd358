//! Constraint filter: selects nodes by identity and labels.
//!
//! The reserved key `node` pins a workload to nodes whose id or name
//! matches. Every other key is looked up in the node's labels, with a
//! missing label reading as the empty string.

use berth_core::{Node, WorkloadRequest};

use super::Filter;
use super::expr::{self, Expr};
use crate::error::{SchedulingError, SchedulingResult};

/// Key that matches a node's id or name instead of a label.
pub const NODE_KEY: &str = "node";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintFilter;

fn node_matches(constraint: &Expr, node: &Node) -> bool {
    match constraint.key() {
        NODE_KEY => constraint.matches([node.id.as_str(), node.name.as_str()]),
        key => constraint.matches([node.label(key)]),
    }
}

impl Filter for ConstraintFilter {
    fn name(&self) -> &'static str {
        "constraint"
    }

    fn filter<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
        enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let constraints = expr::parse_exprs(&request.constraints)?;
        expr::narrow(
            &constraints,
            nodes,
            enforce_soft,
            request.id(),
            node_matches,
            |c| SchedulingError::NoNodeSatisfiesConstraint(c.to_string()),
        )
    }

    fn get_filters(&self, request: &WorkloadRequest) -> SchedulingResult<Vec<String>> {
        Ok(expr::parse_exprs(&request.constraints)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }
}
