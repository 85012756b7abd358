//! berth-scheduler: decides where a workload may run.
//!
//! Given a node snapshot and a [`WorkloadRequest`](berth_core::WorkloadRequest),
//! the scheduler narrows the candidates through an ordered filter chain
//! and ranks the survivors with a placement strategy. It never places
//! anything itself; the caller acts on the returned order.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── Filter chain (health → port → affinity → constraint)
//!   │   └── strict pass, then one relaxed pass without soft expressions
//!   └── PlacementStrategy (weighted | binpack | random)
//! ```
//!
//! Everything is synchronous and free of I/O. A built [`Scheduler`] is
//! immutable and can be shared between threads.

pub mod error;
pub mod filter;
pub mod scheduler;
pub mod strategy;

pub use error::{ConfigError, SchedulingError, SchedulingResult};
pub use filter::{Filter, apply_filters};
pub use scheduler::Scheduler;
pub use strategy::PlacementStrategy;
