//! Filter chain: ordered predicates that narrow the candidate nodes.
//!
//! Each filter receives the survivors of the previous one. Filters never
//! reorder nodes; ranking belongs to the placement strategy.

pub mod affinity;
pub mod constraint;
pub mod expr;
pub mod health;
pub mod port;

use std::collections::HashSet;

use berth_core::{Node, SchedulerConfig, WorkloadRequest};
use tracing::debug;

use crate::error::{ConfigError, SchedulingResult};

pub use affinity::AffinityFilter;
pub use constraint::ConstraintFilter;
pub use health::HealthFilter;
pub use port::PortFilter;

/// A stage of the filter chain.
pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return the subset of `nodes` that may host `request`, in input order.
    ///
    /// Soft expressions are only evaluated when `enforce_soft` is set.
    fn filter<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
        enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>>;

    /// Human-readable expressions this filter would evaluate for `request`.
    fn get_filters(&self, _request: &WorkloadRequest) -> SchedulingResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Run `nodes` through every filter in order.
///
/// Once a filter leaves no candidates the remaining filters are skipped and
/// the empty set is returned, so later expressions are never reported as
/// unsatisfied against nodes an earlier stage already removed.
pub fn apply_filters<'a>(
    filters: &[Box<dyn Filter>],
    request: &WorkloadRequest,
    nodes: &'a [Node],
    enforce_soft: bool,
) -> SchedulingResult<Vec<&'a Node>> {
    filters
        .iter()
        .try_fold(nodes.iter().collect::<Vec<_>>(), |candidates, filter| {
            // Nothing left to narrow; the caller reports an empty chain result.
            if candidates.is_empty() {
                return Ok(candidates);
            }
            let before = candidates.len();
            let accepted = filter.filter(request, candidates, enforce_soft)?;
            debug!(
                workload = request.id(),
                filter = filter.name(),
                before,
                after = accepted.len(),
                "filter applied"
            );
            Ok(accepted)
        })
}

/// Build a filter by name.
pub fn by_name(name: &str, config: &SchedulerConfig) -> Result<Box<dyn Filter>, ConfigError> {
    match name {
        "constraint" => Ok(Box::new(ConstraintFilter)),
        "affinity" => Ok(Box::new(AffinityFilter)),
        "health" => Ok(Box::new(HealthFilter::new(config.min_health))),
        "port" => Ok(Box::new(PortFilter)),
        other => Err(ConfigError::UnknownFilter(other.to_string())),
    }
}

/// Build the configured chain, preserving order.
pub fn from_config(config: &SchedulerConfig) -> Result<Vec<Box<dyn Filter>>, ConfigError> {
    let mut seen = HashSet::new();
    config
        .filters
        .iter()
        .map(|name| {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFilter(name.clone()));
            }
            by_name(name, config)
        })
        .collect()
}
