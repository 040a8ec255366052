//! Private module for selective re-export.

use crate::dist::Distribution;
use crate::rng::SplitMix64;
use crate::server::{Server, ServerStats, EPSILON};

#[derive(Clone, Copy, Debug)]
struct Job {
    remaining: f64,
    attained: f64,
    arrival_time: f64,
}

/// Foreground-background, also known as least-attained-service.
///
/// The server's full rate is split evenly over the *active set*: the jobs
/// currently tied (within a fixed 1e-12 epsilon) for least attained
/// service. Jobs
/// outside the active set receive no work. Two horizons compete for the
/// next event: the first active job draining to zero remaining size, and
/// the active set's attained level catching up to the least attained
/// inactive job (a level crossing, which merely widens the active set).
///
/// The shared epsilon keeps equal-attained jobs from drifting apart by
/// rounding; without it the active set fragments.
#[derive(Clone, Debug)]
pub struct ForegroundBackground {
    service: Distribution,
    buffer_capacity: Option<usize>,
    stats: ServerStats,
    jobs: Vec<Job>,
    ttnc: f64,
}

impl ForegroundBackground {
    pub fn new(service: Distribution) -> Self {
        Self {
            service,
            buffer_capacity: None,
            stats: ServerStats::default(),
            jobs: Vec::new(),
            ttnc: f64::INFINITY,
        }
    }

    /// Caps the number in system. Validated (nonzero) when a run starts.
    pub fn with_buffer(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    fn least_attained(&self) -> f64 {
        self.jobs
            .iter()
            .fold(f64::INFINITY, |acc, job| acc.min(job.attained))
    }

    fn recompute_horizons(&mut self) {
        if self.jobs.is_empty() {
            self.ttnc = f64::INFINITY;
            return;
        }
        let floor = self.least_attained();
        let mut active = 0usize;
        let mut min_remaining_active = f64::INFINITY;
        let mut next_level = f64::INFINITY;
        for job in &self.jobs {
            if job.attained <= floor + EPSILON {
                active += 1;
                min_remaining_active = min_remaining_active.min(job.remaining);
            } else {
                next_level = next_level.min(job.attained);
            }
        }
        let completion = min_remaining_active * active as f64;
        let crossing = if next_level.is_finite() {
            (next_level - floor) * active as f64
        } else {
            f64::INFINITY
        };
        self.ttnc = completion.min(crossing);
    }
}

impl Server for ForegroundBackground {
    fn reset(&mut self) {
        self.stats.reset();
        self.jobs.clear();
        self.ttnc = f64::INFINITY;
    }

    fn arrival(&mut self, rng: &mut SplitMix64) {
        self.stats.state += 1;
        self.jobs.push(Job {
            remaining: self.service.sample(rng),
            attained: 0.0,
            arrival_time: self.stats.clock,
        });
        // Zero attained service puts the newcomer at (or alone on) the
        // active floor.
        self.recompute_horizons();
    }

    fn update(&mut self, dt: f64, _rng: &mut SplitMix64) -> bool {
        self.stats.advance(dt);
        if self.jobs.is_empty() {
            return false;
        }
        let floor = self.least_attained();
        let active = self
            .jobs
            .iter()
            .filter(|job| job.attained <= floor + EPSILON)
            .count();
        let share = dt / active as f64;
        let mut min = 0;
        for i in 0..self.jobs.len() {
            if self.jobs[i].attained <= floor + EPSILON {
                self.jobs[i].remaining -= share;
                self.jobs[i].attained += share;
            }
            if self.jobs[i].remaining < self.jobs[min].remaining {
                min = i;
            }
        }
        let finished = if self.jobs[min].remaining <= EPSILON {
            let job = self.jobs.remove(min);
            let response = self.stats.clock - job.arrival_time;
            self.stats.record_completion(response);
            true
        } else {
            false
        };
        // Either a job left or the active set may have widened.
        self.recompute_horizons();
        finished
    }

    fn time_to_next_completion(&self) -> f64 {
        self.ttnc
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
            buffer_capacity: self.buffer_capacity,
            stats: ServerStats::default(),
            jobs: Vec::new(),
            ttnc: f64::INFINITY,
        })
    }

    fn buffer_capacity(&self) -> Option<usize> {
        self.buffer_capacity
    }
}
