//! Independent replications, optionally spread across worker threads.
//!
//! Each replication runs an entirely private simulation: its own RNG
//! seeded from `(base_seed, index)`, its own deep-copied servers, shared
//! read-only access to the blueprint and routing. Workers receive
//! disjoint contiguous index ranges and write to disjoint chunks of the
//! output arrays, so the batch needs no synchronization beyond the final
//! join, and its output is bit-identical for any worker count.

use serde::Serialize;

use crate::rng::replication_seed;
use crate::routing::RoutingMatrix;
use crate::server::Server;
use crate::stats::{self, ConfidenceInterval};
use crate::system::{Estimates, QueueSystem, SimOptions, Simulation};
use crate::{Distribution, Error};

/// Raw per-replication estimates, index-aligned with the replication id.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Replications {
    pub mean_n: Vec<f64>,
    pub mean_t: Vec<f64>,
}

impl Replications {
    pub fn len(&self) -> usize {
        self.mean_t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_t.is_empty()
    }

    /// Student-t interval over the per-replication mean numbers in
    /// system.
    pub fn interval_n(&self, confidence: f64) -> Result<ConfidenceInterval, Error> {
        stats::confidence_interval(&self.mean_n, confidence)
    }

    /// Student-t interval over the per-replication mean sojourn times.
    pub fn interval_t(&self, confidence: f64) -> Result<ConfidenceInterval, Error> {
        stats::confidence_interval(&self.mean_t, confidence)
    }
}

/// Options for a replication batch. Created by [`QueueSystem::replicate`].
pub struct ReplicationBuilder<'a> {
    system: &'a QueueSystem,
    replications: usize,
    num_events: u64,
    seed: Option<u64>,
    warmup: u64,
    threads: usize,
}

impl<'a> ReplicationBuilder<'a> {
    pub(crate) fn new(system: &'a QueueSystem) -> Self {
        Self {
            system,
            replications: 30,
            num_events: 1_000_000,
            seed: None,
            warmup: 0,
            threads: 0,
        }
    }

    /// Number of independent replications. Defaults to 30.
    pub fn replications(mut self, count: usize) -> Self {
        self.replications = count;
        self
    }

    /// Measurement exits per replication. Defaults to 10^6.
    pub fn events(mut self, num_events: u64) -> Self {
        self.num_events = num_events;
        self
    }

    /// Base seed for deterministic per-replication seed derivation.
    /// Defaults to a fresh entropy draw.
    pub fn seed(mut self, base_seed: u64) -> Self {
        self.seed = Some(base_seed);
        self
    }

    /// Warmup exits discarded per replication. Defaults to 0.
    pub fn warmup(mut self, exits: u64) -> Self {
        self.warmup = exits;
        self
    }

    /// Worker thread count; 0 (the default) means
    /// `min(available cores, replications)`.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Runs the batch and returns the raw per-replication estimates.
    pub fn run(self) -> Result<Replications, Error> {
        self.system.validate()?;
        if self.replications == 0 {
            return Err(Error::ZeroReplications);
        }
        let base_seed = self.seed.unwrap_or_else(rand::random);
        let count = self.replications;
        let thread_count = if self.threads == 0 {
            num_cpus::get().min(count)
        } else {
            self.threads.min(count)
        };
        log::debug!(
            "replicate: {} runs of {} events on {} threads, base seed {}",
            count,
            self.num_events,
            thread_count,
            base_seed
        );

        // A policy-aware structural copy per worker run; the originals
        // stay untouched behind their handles.
        let blueprint: Vec<Box<dyn Server>> = self
            .system
            .servers
            .iter()
            .map(|server| server.lock().clone_blueprint())
            .collect();
        let options = SimOptions {
            num_events: self.num_events,
            warmup: self.warmup,
            track_response_times: false,
            track_events: false,
        };

        let mut mean_n = vec![0.0; count];
        let mut mean_t = vec![0.0; count];
        let chunk_len = (count + thread_count - 1) / thread_count;
        if thread_count <= 1 {
            run_chunk(
                0,
                base_seed,
                &blueprint,
                self.system.arrival,
                &self.system.routing,
                options,
                &mut mean_n,
                &mut mean_t,
            );
        } else {
            let blueprint = &blueprint;
            let arrival = self.system.arrival;
            let routing = &self.system.routing;
            crossbeam_utils::thread::scope(|scope| {
                for (worker, (out_n, out_t)) in mean_n
                    .chunks_mut(chunk_len)
                    .zip(mean_t.chunks_mut(chunk_len))
                    .enumerate()
                {
                    scope.spawn(move |_| {
                        run_chunk(
                            worker * chunk_len,
                            base_seed,
                            blueprint,
                            arrival,
                            routing,
                            options,
                            out_n,
                            out_t,
                        );
                    });
                }
            })
            .expect("a replication worker panicked");
        }
        Ok(Replications { mean_n, mean_t })
    }
}

#[allow(clippy::too_many_arguments)]
fn run_chunk(
    first_index: usize,
    base_seed: u64,
    blueprint: &[Box<dyn Server>],
    arrival: Distribution,
    routing: &RoutingMatrix,
    options: SimOptions,
    out_n: &mut [f64],
    out_t: &mut [f64],
) {
    log::debug!(
        "worker: replications {}..{}",
        first_index,
        first_index + out_n.len()
    );
    for (offset, (out_n, out_t)) in out_n.iter_mut().zip(out_t.iter_mut()).enumerate() {
        let index = first_index + offset;
        let seed = replication_seed(base_seed, index as u64);
        let mut servers: Vec<Box<dyn Server>> =
            blueprint.iter().map(|s| s.clone_blueprint()).collect();
        let refs: Vec<&mut Box<dyn Server>> = servers.iter_mut().collect();
        let Estimates { mean_n, mean_t } =
            Simulation::new(refs, arrival, routing, seed, options).run();
        *out_n = mean_n;
        *out_t = mean_t;
    }
}
