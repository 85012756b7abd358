//! Placement strategies: order the nodes that survived filtering.

pub mod binpack;
pub mod random;
pub mod weighted;

use berth_core::{Node, SchedulerConfig, WorkloadRequest};

use crate::error::{ConfigError, SchedulingResult};

pub use binpack::BinpackStrategy;
pub use random::RandomStrategy;
pub use weighted::WeightedStrategy;

/// Ranks candidate nodes by preference, most preferred first.
pub trait PlacementStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Order `nodes` for `request`, dropping those that cannot host it.
    ///
    /// Returns [`SchedulingError::NoResourcesAvailable`](crate::SchedulingError::NoResourcesAvailable)
    /// when none can.
    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
    ) -> SchedulingResult<Vec<&'a Node>>;
}

/// Build the strategy named in `config`.
///
/// `spread` is accepted as another name for `weighted`.
pub fn from_config(config: &SchedulerConfig) -> Result<Box<dyn PlacementStrategy>, ConfigError> {
    match config.strategy.as_str() {
        "weighted" | "spread" => Ok(Box::new(WeightedStrategy::new(config.healthiness_factor))),
        "binpack" => Ok(Box::new(BinpackStrategy::new(config.healthiness_factor))),
        "random" => Ok(Box::new(RandomStrategy::new(config.random_seed))),
        other => Err(ConfigError::UnknownStrategy(other.to_string())),
    }
}
