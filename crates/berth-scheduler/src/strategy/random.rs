//! Random placement, for spreading load without looking at usage.

use berth_core::{Node, WorkloadRequest};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::PlacementStrategy;
use crate::error::{SchedulingError, SchedulingResult};

/// Shuffles every node large enough for the request.
///
/// With a seed, every call yields the same order for the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy {
    seed: Option<u64>,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl PlacementStrategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: Vec<&'a Node>,
    ) -> SchedulingResult<Vec<&'a Node>> {
        let mut candidates: Vec<&Node> = nodes
            .into_iter()
            .filter(|node| node.can_ever_fit(request))
            .collect();
        if candidates.is_empty() {
            return Err(SchedulingError::NoResourcesAvailable);
        }

        match self.seed {
            Some(seed) => candidates.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => candidates.shuffle(&mut rand::rng()),
        }
        Ok(candidates)
    }
}
