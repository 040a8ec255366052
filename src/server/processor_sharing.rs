//! Private module for selective re-export.

use crate::dist::Distribution;
use crate::rng::SplitMix64;
use crate::server::{Server, ServerStats, EPSILON};

#[derive(Clone, Copy, Debug)]
struct Job {
    remaining: f64,
    arrival_time: f64,
}

/// Processor sharing across `k` servers' worth of capacity.
///
/// With `n` jobs present, each receives service at rate `min(k, n) / n`:
/// full rate while capacity covers everyone, an even slowdown once
/// `n > k`. The wall-clock time to the next completion is therefore
/// `min(remaining) · n / min(k, n)`.
#[derive(Clone, Debug)]
pub struct ProcessorSharing {
    service: Distribution,
    num_servers: usize,
    buffer_capacity: Option<usize>,
    stats: ServerStats,
    jobs: Vec<Job>,
}

impl ProcessorSharing {
    pub fn new(service: Distribution) -> Self {
        Self {
            service,
            num_servers: 1,
            buffer_capacity: None,
            stats: ServerStats::default(),
            jobs: Vec::new(),
        }
    }

    /// Capacity in server-equivalents. Validated (nonzero) when a run
    /// starts.
    pub fn with_servers(mut self, count: usize) -> Self {
        self.num_servers = count;
        self
    }

    /// Caps the number in system. Validated (nonzero) when a run starts.
    pub fn with_buffer(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    fn per_job_rate(&self) -> f64 {
        self.num_servers.min(self.jobs.len()) as f64 / self.jobs.len() as f64
    }

    fn min_remaining_job(&self) -> usize {
        let mut min = 0;
        for (i, job) in self.jobs.iter().enumerate().skip(1) {
            if job.remaining < self.jobs[min].remaining {
                min = i;
            }
        }
        min
    }
}

impl Server for ProcessorSharing {
    fn reset(&mut self) {
        self.stats.reset();
        self.jobs.clear();
    }

    fn arrival(&mut self, rng: &mut SplitMix64) {
        self.stats.state += 1;
        self.jobs.push(Job {
            remaining: self.service.sample(rng),
            arrival_time: self.stats.clock,
        });
    }

    fn update(&mut self, dt: f64, _rng: &mut SplitMix64) -> bool {
        self.stats.advance(dt);
        if self.jobs.is_empty() {
            return false;
        }
        let share = dt * self.per_job_rate();
        for job in &mut self.jobs {
            job.remaining -= share;
        }
        let min = self.min_remaining_job();
        if self.jobs[min].remaining > EPSILON {
            return false;
        }
        let finished = self.jobs.remove(min);
        let response = self.stats.clock - finished.arrival_time;
        self.stats.record_completion(response);
        true
    }

    fn time_to_next_completion(&self) -> f64 {
        if self.jobs.is_empty() {
            return f64::INFINITY;
        }
        self.jobs[self.min_remaining_job()].remaining / self.per_job_rate()
    }

    fn stats(&self) -> &ServerStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut ServerStats {
        &mut self.stats
    }

    fn clone_blueprint(&self) -> Box<dyn Server> {
        Box::new(Self {
            service: self.service,
            num_servers: self.num_servers,
            buffer_capacity: self.buffer_capacity,
            stats: ServerStats::default(),
            jobs: Vec::new(),
        })
    }

    fn num_servers(&self) -> usize {
        self.num_servers
    }

    fn buffer_capacity(&self) -> Option<usize> {
        self.buffer_capacity
    }
}
