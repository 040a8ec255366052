//! Private module for selective re-export.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use noisy_float::prelude::*;

use crate::dist::Distribution;
use crate::rng::SplitMix64;
use crate::server::{Server, ServerStats, EPSILON};

#[derive(Clone, Copy, Debug)]
struct InService {
    remaining: f64,
    arrival_time: f64,
}

/// Preemptive shortest-remaining-processing-time.
///
/// Exactly one job is in service at a time; its remaining size and
/// arrival timestamp live outside the heap so the completing job's
/// arrival time can be read before the next job is installed. Preempted
/// jobs keep their remaining size exactly as of the preemption moment.
/// Jobs with equal remaining size are ordered by arrival time, which
/// makes tie-breaking deterministic under a fixed seed.
#[derive(Clone, Debug)]
pub struct Srpt {
    service: Distribution,
    buffer_capacity: Option<usize>,
    stats: ServerStats,
    /// Waiting jobs, min-ordered on (remaining, arrival_time).
    queue: BinaryHeap<Reverse<(N64, N64)>>,
    in_service: Option<InService>,
}

impl Srpt {
    pub fn new(service: Distribution) -> Self {
        Self {
            service,
            buffer_capacity: None,
            stats: ServerStats::default(),
            queue: BinaryHeap::new(),
            in_service: None,
        }
    }

    /// Caps the number in system. Validated (nonzero) when a run starts.
    pub fn with_buffer(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    fn install_next(&mut self) {
        self.in_service = self.queue.pop().map(|Reverse((remaining, arrival_time))| InService {
            remaining: remaining.raw(),
            arrival_time: arrival_time.raw(),
        });
    }
}

impl Server for Srpt {
    fn reset(&mut self) {
        self.stats.reset();
        self.queue.clear();
        self.in_service = None;
    }

    fn arrival(&mut self, rng: &mut SplitMix64) {
        self.stats.state += 1;
        let size = self.service.sample(rng);
        match self.in_service {
            None => {
                self.in_service = Some(InService {
                    remaining: size,
                    arrival_time: self.stats.clock,
                });
            }
            Some(current) => {
                // Contend the new job against the one in service; the
                // smaller remaining size wins the server.
                self.queue
                    .push(Reverse((n64(current.remaining), n64(current.arrival_time))));
                self.queue.push(Reverse((n64(size), n64(self.stats.clock))));
                self.install_next();
            }
        }
    }

    fn update(&mut self, dt: f64, _rng: &mut SplitMix64) -> bool {
        self.stats.advance(dt);
        let current = match self.in_service.as_mut() {
            Some(current) => current,
            None => return false,
        };
        current.remaining -= dt;
        if current.remaining > EPSILON {
            return false;
        }
        // Read the completing job's arrival time before the next job
        // replaces it.
        let response = self.stats.clock - current.arrival_time;
        self.install_next();
        self.stats.record_completion(response);
        true
    }

    fn time_to_next_completion(&self) -> f64 {
        self.in_service
            .map_or(f64::INFINITY, |current| current.remaining)
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
            queue: BinaryHeap::new(),
            in_service: None,
        })
    }

    fn buffer_capacity(&self) -> Option<usize> {
        self.buffer_capacity
    }
}
