//! Scheduler: runs the filter chain and hands survivors to the strategy.
//!
//! Selection happens in at most two passes. The strict pass enforces soft
//! expressions. If filtering fails, the chain runs once more with soft
//! expressions ignored and that outcome is final. Capacity exhaustion
//! reported by the strategy is never retried: relaxing preferences
//! cannot create room on a node.

use berth_core::config::DEFAULT_MIN_HEALTH;
use berth_core::{Node, SchedulerConfig, WorkloadRequest};
use tracing::{debug, info};

use crate::error::{ConfigError, SchedulingError, SchedulingResult};
use crate::filter::{self, Filter};
use crate::strategy::{self, PlacementStrategy};

/// An immutable filter chain plus placement strategy.
pub struct Scheduler {
    strategy: Box<dyn PlacementStrategy>,
    filters: Vec<Box<dyn Filter>>,
}

impl Scheduler {
    pub fn new(strategy: Box<dyn PlacementStrategy>, filters: Vec<Box<dyn Filter>>) -> Self {
        Self { strategy, filters }
    }

    /// Build the strategy and filter chain named in `config`.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, ConfigError> {
        let scheduler = Self::new(strategy::from_config(config)?, filter::from_config(config)?);
        info!(
            strategy = scheduler.strategy(),
            filters = %scheduler.filters(),
            healthiness_factor = config.healthiness_factor,
            "scheduler configured"
        );
        Ok(scheduler)
    }

    /// Return the nodes where `request` can run, most preferred first.
    pub fn select_nodes_for_container<'a>(
        &self,
        nodes: &'a [Node],
        request: &WorkloadRequest,
    ) -> SchedulingResult<Vec<&'a Node>> {
        match self.select(nodes, request, true) {
            Err(err) if err.is_relaxable() => {
                debug!(
                    workload = request.id(),
                    nodes = nodes.len(),
                    error = %err,
                    "strict pass failed, relaxing soft expressions"
                );
                let relaxed = self.select(nodes, request, false);
                if let Err(err) = &relaxed {
                    debug!(
                        workload = request.id(),
                        nodes = nodes.len(),
                        error = %err,
                        "relaxed pass failed"
                    );
                }
                relaxed
            }
            outcome => outcome,
        }
    }

    fn select<'a>(
        &self,
        nodes: &'a [Node],
        request: &WorkloadRequest,
        enforce_soft: bool,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let accepted = filter::apply_filters(&self.filters, request, nodes, enforce_soft)?;
        debug!(
            workload = request.id(),
            accepted = accepted.len(),
            enforce_soft,
            "filtered nodes"
        );
        if accepted.is_empty() {
            return Err(SchedulingError::NoNodesAvailable);
        }

        self.strategy.rank_and_sort(request, accepted)
    }

    /// Name of the configured strategy.
    pub fn strategy(&self) -> &str {
        self.strategy.name()
    }

    /// Names of the configured filters, in chain order.
    pub fn filters(&self) -> String {
        self.filters
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Expressions each filter would evaluate for `request`.
    ///
    /// Filters with nothing to evaluate are left out.
    pub fn describe_filters(
        &self,
        request: &WorkloadRequest,
    ) -> SchedulingResult<Vec<(&'static str, Vec<String>)>> {
        let mut described = Vec::new();
        for filter in &self.filters {
            let exprs = filter.get_filters(request)?;
            if !exprs.is_empty() {
                described.push((filter.name(), exprs));
            }
        }
        Ok(described)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(
            Box::new(strategy::WeightedStrategy::default()),
            vec![
                Box::new(filter::HealthFilter::new(DEFAULT_MIN_HEALTH)),
                Box::new(filter::PortFilter),
                Box::new(filter::AffinityFilter),
                Box::new(filter::ConstraintFilter),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::test_support::{ids, node};

    fn request(constraints: &[&str]) -> WorkloadRequest {
        WorkloadRequest {
            cpu_shares: 1,
            memory: 10,
            constraints: constraints.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn constraint_only() -> Scheduler {
        Scheduler::new(
            Box::new(strategy::WeightedStrategy::new(0)),
            vec![Box::new(filter::ConstraintFilter)],
        )
    }

    #[test]
    fn strict_pass_result_is_used_when_it_succeeds() {
        let nodes = vec![node("a", &[("zone", "east")]), node("b", &[("zone", "west")])];
        let ranked = constraint_only()
            .select_nodes_for_container(&nodes, &request(&["zone==~west"]))
            .unwrap();
        assert_eq!(ids(&ranked), vec!["b"]);
    }

    #[test]
    fn unsatisfiable_soft_constraint_is_relaxed() {
        let nodes = vec![node("a", &[("zone", "east")]), node("b", &[("zone", "west")])];
        let ranked = constraint_only()
            .select_nodes_for_container(&nodes, &request(&["zone==east", "rack==~5"]))
            .unwrap();
        assert_eq!(ids(&ranked), vec!["a"]);
    }

    #[test]
    fn hard_constraint_never_yields() {
        let nodes = vec![node("a", &[("zone", "east")])];
        let err = constraint_only()
            .select_nodes_for_container(&nodes, &request(&["zone==west"]))
            .unwrap_err();
        assert_eq!(err, SchedulingError::NoNodeSatisfiesConstraint("zone==west".into()));
    }

    #[test]
    fn empty_snapshot_reports_no_nodes() {
        let err = constraint_only()
            .select_nodes_for_container(&[], &request(&[]))
            .unwrap_err();
        assert_eq!(err, SchedulingError::NoNodesAvailable);
    }

    #[test]
    fn resource_exhaustion_is_not_retried() {
        let mut a = node("a", &[("zone", "east")]);
        a.total_memory = 5;
        let b = node("b", &[("zone", "west")]);
        let nodes = vec![a, b];

        // Strict pass keeps only `a`, which is too small. Relaxing would
        // admit `b`, but capacity errors must surface as-is.
        let err = constraint_only()
            .select_nodes_for_container(&nodes, &request(&["zone==~east"]))
            .unwrap_err();
        assert_eq!(err, SchedulingError::NoResourcesAvailable);
    }

    #[test]
    fn syntax_errors_are_not_retried() {
        let nodes = vec![node("a", &[])];
        let err = constraint_only()
            .select_nodes_for_container(&nodes, &request(&["zone"]))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::ConstraintSyntax { .. }));
    }

    #[test]
    fn descriptors() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.strategy(), "weighted");
        assert_eq!(scheduler.filters(), "health, port, affinity, constraint");
    }

    #[test]
    fn describe_filters_skips_empty_filters() {
        let scheduler = Scheduler::default();
        let mut req = request(&["zone==east", "rack==~5"]);
        req.affinities = vec!["container!=db".into()];

        let described = scheduler.describe_filters(&req).unwrap();
        assert_eq!(
            described,
            vec![
                ("affinity", vec!["container!=db".to_string()]),
                ("constraint", vec!["zone==east".to_string(), "rack==5".to_string()]),
            ]
        );
    }

    #[test]
    fn from_config_rejects_unknown_names() {
        let config = SchedulerConfig {
            strategy: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            Scheduler::from_config(&config),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }
}
