//! Scheduler error types.

use thiserror::Error;

/// Errors returned by a node selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("invalid expression {expr:?}: {reason}")]
    ConstraintSyntax { expr: String, reason: String },

    #[error("unable to find a node that satisfies the constraint {0}")]
    NoNodeSatisfiesConstraint(String),

    #[error("unable to find a node that satisfies the affinity {0}")]
    NoNodeSatisfiesAffinity(String),

    #[error("no nodes available in the cluster")]
    NoNodesAvailable,

    #[error("no resources available to schedule container")]
    NoResourcesAvailable,
}

impl SchedulingError {
    /// Whether dropping soft expressions could change the outcome.
    ///
    /// Syntax errors fail identically on every pass and capacity
    /// exhaustion is not affected by soft expressions.
    pub fn is_relaxable(&self) -> bool {
        matches!(
            self,
            Self::NoNodeSatisfiesConstraint(_)
                | Self::NoNodeSatisfiesAffinity(_)
                | Self::NoNodesAvailable
        )
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Errors building a scheduler from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown placement strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("filter configured more than once: {0}")]
    DuplicateFilter(String),
}
