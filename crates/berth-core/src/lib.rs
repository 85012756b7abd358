//! berth-core: shared types for the Berth placement engine.
//!
//! Holds the passive data the scheduler reads (node snapshots and
//! workload requests) and the TOML-backed scheduler configuration.
//! Nothing in here makes a placement decision.

pub mod config;
pub mod types;

pub use config::SchedulerConfig;
pub use types::*;
