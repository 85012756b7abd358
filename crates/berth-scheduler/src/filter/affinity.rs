//! Affinity filter: co-locates with (or away from) running workloads.
//!
//! `container==db*` keeps nodes running a matching workload,
//! `container!=db` keeps nodes running none.

use berth_core::{Node, WorkloadRequest};

use super::Filter;
use super::expr::{self, Expr};
use crate::error::{SchedulingError, SchedulingResult};

pub const CONTAINER_KEY: &str = "container";

#[derive(Debug, Clone, Copy, Default)]
pub struct AffinityFilter;

fn parse_affinities(request: &WorkloadRequest) -> SchedulingResult<Vec<Expr>> {
    let affinities = expr::parse_exprs(&request.affinities)?;
    if let Some((raw, bad)) = request
        .affinities
        .iter()
        .zip(&affinities)
        .find(|(_, a)| a.key() != CONTAINER_KEY)
    {
        return Err(SchedulingError::ConstraintSyntax {
            expr: raw.clone(),
            reason: format!("unsupported affinity key {:?}", bad.key()),
        });
    }
    Ok(affinities)
}

impl Filter for AffinityFilter {
    fn name(&self) -> &'static str {
        "affinity"
    }

    fn filter<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
        enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let affinities = parse_affinities(request)?;
        expr::narrow(
            &affinities,
            nodes,
            enforce_soft,
            request.id(),
            |affinity, node| affinity.matches(node.containers.iter().map(String::as_str)),
            |a| SchedulingError::NoNodeSatisfiesAffinity(a.to_string()),
        )
    }

    fn get_filters(&self, request: &WorkloadRequest) -> SchedulingResult<Vec<String>> {
        Ok(parse_affinities(request)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }
}
