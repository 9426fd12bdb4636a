//! Export worker pool.
//!
//! Runs a fixed number of concurrent workers, each repeatedly leasing
//! jobs from the store, driving the bundle builder, and recording the
//! terminal state. One job's failure never stops the pool.

pub mod config;
pub mod pool;
pub mod publisher;
pub mod runner;

pub use config::WorkerConfig;
pub use pool::WorkerPool;
pub use publisher::{PublishError, ResultPublisher};
pub use runner::{JobOutcome, JobRunner};
