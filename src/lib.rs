//! A discrete-event simulator for open queueing networks.
//!
//! Networks are built from stateful servers (each running one of four
//! scheduling policies), an exogenous arrival process, and probabilistic
//! routing between servers and the system exit. A run advances a shared
//! clock by the time to the next event (the minimum completion horizon
//! across servers, or the next external arrival) and accumulates the
//! time-averaged number in system E[N] and mean sojourn time E[T], with
//! optional per-job sojourn times and a full event trace. Batches of
//! statistically independent replications can run across worker threads
//! with deterministic per-replication seeding, and their outputs feed
//! Student-t confidence intervals.
//!
//! An M/M/1 queue at load 0.5, where E[T] = 1/(μ−λ) = 1:
//!
//! ```rust
//! use queuenet::{shared, Distribution, Fcfs, QueueSystem};
//!
//! let service = Distribution::exponential(2.0)?;
//! let arrivals = Distribution::exponential(1.0)?;
//! let mut system = QueueSystem::new(vec![shared(Fcfs::new(service))], arrivals);
//!
//! let (mean_n, mean_t) = system.sim().events(50_000).seed(42).run()?;
//! assert!((mean_t - 1.0).abs() < 0.1);
//! assert!((mean_n - 1.0).abs() < 0.1);
//! # Ok::<(), queuenet::Error>(())
//! ```
//!
//! Replications with a 95% confidence interval:
//!
//! ```rust
//! use queuenet::{shared, Distribution, ProcessorSharing, QueueSystem};
//!
//! let service = Distribution::exponential(2.0)?;
//! let arrivals = Distribution::exponential(1.0)?;
//! let system = QueueSystem::new(vec![shared(ProcessorSharing::new(service))], arrivals);
//!
//! let raw = system
//!     .replicate()
//!     .replications(10)
//!     .events(10_000)
//!     .seed(7)
//!     .run()?;
//! let interval = raw.interval_t(0.95)?;
//! assert!(interval.contains(interval.mean));
//! # Ok::<(), queuenet::Error>(())
//! ```

mod dist;
mod error;
mod event_log;
mod replicate;
mod routing;
pub mod rng;
mod server;
pub mod stats;
mod system;
#[cfg(test)]
pub mod test_util;

pub use dist::Distribution;
pub use error::Error;
pub use event_log::{Event, EventKind, EventLog, EXTERNAL};
pub use replicate::{ReplicationBuilder, Replications};
pub use routing::RoutingMatrix;
pub use server::{
    shared, Fcfs, ForegroundBackground, ProcessorSharing, Server, ServerStats, SharedServer, Srpt,
};
pub use stats::{confidence_interval, ConfidenceInterval};
pub use system::{QueueSystem, SimBuilder};
