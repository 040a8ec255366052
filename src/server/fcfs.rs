//! Private module for selective re-export.

use std::collections::VecDeque;

use crate::dist::Distribution;
use crate::rng::SplitMix64;
use crate::server::{Server, ServerStats, EPSILON};

#[derive(Clone, Copy, Debug)]
struct Channel {
    remaining: f64,
    arrival_time: f64,
}

/// First-come-first-served with `k` parallel channels.
///
/// An arriving job starts service immediately when a channel is free;
/// otherwise its arrival timestamp waits in a FIFO queue. When a channel
/// completes, the front of the queue takes it over with a freshly sampled
/// service size, keeping the original arrival timestamp so queueing delay
/// is charged to the job. With `k = 1` this is the classic M/G/1 FCFS
/// discipline; completion order equals arrival order.
#[derive(Clone, Debug)]
pub struct Fcfs {
    service: Distribution,
    num_servers: usize,
    buffer_capacity: Option<usize>,
    stats: ServerStats,
    channels: Vec<Channel>,
    wait_queue: VecDeque<f64>,
}

impl Fcfs {
    pub fn new(service: Distribution) -> Self {
        Self {
            service,
            num_servers: 1,
            buffer_capacity: None,
            stats: ServerStats::default(),
            channels: Vec::new(),
            wait_queue: VecDeque::new(),
        }
    }

    /// Number of parallel channels. Validated (nonzero) when a run starts.
    pub fn with_servers(mut self, count: usize) -> Self {
        self.num_servers = count;
        self
    }

    /// Caps the number in system. Validated (nonzero) when a run starts.
    pub fn with_buffer(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    fn min_remaining_channel(&self) -> usize {
        let mut min = 0;
        for (i, channel) in self.channels.iter().enumerate().skip(1) {
            if channel.remaining < self.channels[min].remaining {
                min = i;
            }
        }
        min
    }
}

impl Server for Fcfs {
    fn reset(&mut self) {
        self.stats.reset();
        self.channels.clear();
        self.wait_queue.clear();
    }

    fn arrival(&mut self, rng: &mut SplitMix64) {
        self.stats.state += 1;
        if self.channels.len() < self.num_servers {
            debug_assert!(self.wait_queue.is_empty());
            self.channels.push(Channel {
                remaining: self.service.sample(rng),
                arrival_time: self.stats.clock,
            });
        } else {
            self.wait_queue.push_back(self.stats.clock);
        }
    }

    fn update(&mut self, dt: f64, rng: &mut SplitMix64) -> bool {
        self.stats.advance(dt);
        if self.channels.is_empty() {
            return false;
        }
        for channel in &mut self.channels {
            channel.remaining -= dt;
        }
        let min = self.min_remaining_channel();
        if self.channels[min].remaining > EPSILON {
            return false;
        }
        let finished = self.channels.remove(min);
        let response = self.stats.clock - finished.arrival_time;
        self.stats.record_completion(response);
        if let Some(queued_at) = self.wait_queue.pop_front() {
            self.channels.push(Channel {
                remaining: self.service.sample(rng),
                arrival_time: queued_at,
            });
        }
        true
    }

    fn time_to_next_completion(&self) -> f64 {
        self.channels
            .iter()
            .fold(f64::INFINITY, |acc, channel| acc.min(channel.remaining))
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
            channels: Vec::new(),
            wait_queue: VecDeque::new(),
        })
    }

    fn num_servers(&self) -> usize {
        self.num_servers
    }

    fn buffer_capacity(&self) -> Option<usize> {
        self.buffer_capacity
    }
}
