//! Server scheduling policies.
//!
//! A server is a state machine driven by three operations: a job arrival,
//! a wall-clock advance of `dt`, and (from the engine's side) routing of a
//! completed job. Four policies implement the contract:
//!
//! - [`Fcfs`]: first-come-first-served over `k` parallel channels.
//! - [`Srpt`]: preemptive shortest-remaining-processing-time.
//! - [`ProcessorSharing`]: egalitarian sharing of `k` servers' capacity.
//! - [`ForegroundBackground`]: least-attained-service priority.
//!
//! The engine only ever advances time by at most the minimum
//! time-to-next-completion across all servers, so a policy sees at most
//! one of its jobs finish per [`update`](Server::update) call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::rng::SplitMix64;

mod fcfs;
mod foreground_background;
mod processor_sharing;
mod srpt;

pub use fcfs::Fcfs;
pub use foreground_background::ForegroundBackground;
pub use processor_sharing::ProcessorSharing;
pub use srpt::Srpt;

/// Completion-detection epsilon. Residual service below this is treated as
/// zero, and attained-service values within this of each other are treated
/// as equal. Fixed so that runs are reproducible.
pub(crate) const EPSILON: f64 = 1e-12;

/// A server held jointly by the caller and a [`QueueSystem`]. The system
/// locks each server only for the duration of a `sim`/`replicate` call;
/// between runs the caller is free to read counters through its own
/// handle.
///
/// [`QueueSystem`]: crate::QueueSystem
pub type SharedServer = Arc<Mutex<Box<dyn Server>>>;

/// Wraps a policy in the shared handle expected by
/// [`QueueSystem::new`](crate::QueueSystem::new).
pub fn shared<S: Server + 'static>(server: S) -> SharedServer {
    Arc::new(Mutex::new(Box::new(server)))
}

/// The behavioral contract every scheduling policy implements.
///
/// Arrival and rejection counters are maintained by the engine, which
/// decides admission *before* calling [`arrival`](Server::arrival);
/// completion counters and response-time accounting are maintained by the
/// policy, which is the only party that knows which job finished.
pub trait Server: Send + Sync {
    /// Restores the empty state and zeroes every counter.
    fn reset(&mut self);

    /// Accepts a job arriving at the server's current local clock. The
    /// caller has already established that the server is not full.
    fn arrival(&mut self, rng: &mut SplitMix64);

    /// Advances the local clock by `dt` and drains `dt` of wall-clock time
    /// through the policy's service rule. Returns true iff exactly one job
    /// completed during this step. Must not report a completion when
    /// `dt` is short of the policy's own completion horizon.
    fn update(&mut self, dt: f64, rng: &mut SplitMix64) -> bool;

    /// Wall-clock time until this server's next completion; +∞ when no
    /// job is in service.
    fn time_to_next_completion(&self) -> f64;

    fn stats(&self) -> &ServerStats;

    fn stats_mut(&mut self) -> &mut ServerStats;

    /// A structural copy for replication workers: distribution, channel
    /// count, and buffer capacity, never dynamic state.
    fn clone_blueprint(&self) -> Box<dyn Server>;

    /// Parallel service channels. Policies that serve one job at a time
    /// report 1.
    fn num_servers(&self) -> usize {
        1
    }

    /// Maximum number in system, or `None` for an unlimited buffer.
    fn buffer_capacity(&self) -> Option<usize>;

    fn is_full(&self) -> bool {
        match self.buffer_capacity() {
            Some(capacity) => self.stats().state >= capacity,
            None => false,
        }
    }
}

/// Counters and clocks common to every policy.
#[derive(Clone, Debug, Default)]
pub struct ServerStats {
    /// Local time; advances in lockstep with the network clock.
    pub clock: f64,
    /// Number in system at this server (in service plus waiting).
    pub state: usize,
    pub num_completions: u64,
    pub num_arrivals: u64,
    pub num_rejected: u64,
    /// Sojourn time of the most recently completed job.
    pub last_response_time: f64,
    total_response: f64,
    busy_time: f64,
}

impl ServerStats {
    /// Mean sojourn time over jobs completed at this server.
    pub fn mean_response(&self) -> f64 {
        self.total_response / self.num_completions.max(1) as f64
    }

    /// Fraction of elapsed local time with at least one job present.
    pub fn utilization(&self) -> f64 {
        if self.clock > 0.0 {
            self.busy_time / self.clock
        } else {
            0.0
        }
    }

    /// Rejected fraction of offered arrivals. Measured on the
    /// steady-state phase only: the engine clears both counters when
    /// warmup ends.
    pub fn loss_probability(&self) -> f64 {
        self.num_rejected as f64 / self.num_arrivals.max(1) as f64
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        self.clock += dt;
        if self.state > 0 {
            self.busy_time += dt;
        }
    }

    pub(crate) fn record_completion(&mut self, response: f64) {
        self.state -= 1;
        self.num_completions += 1;
        self.last_response_time = response;
        self.total_response += response;
    }

    pub(crate) fn clear_loss_counters(&mut self) {
        self.num_arrivals = 0;
        self.num_rejected = 0;
    }
}
