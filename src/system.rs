//! The queueing network and its time-advance engine.
//!
//! A [`QueueSystem`] owns shared handles to its servers plus the arrival
//! process and routing matrix. Configuration is builder-style: construct
//! the system, then chain options off [`QueueSystem::sim`] or
//! [`QueueSystem::replicate`] and call `run()`.
//!
//! The engine advances a shared clock by the minimum of every server's
//! time-to-next-completion and the time to the next external arrival, so
//! no event calendar is needed: the only future events are one completion
//! horizon per server and one arrival horizon for the whole network.

use parking_lot::MutexGuard;

use crate::dist::Distribution;
use crate::event_log::{EventKind, EventLog, EXTERNAL};
use crate::replicate::ReplicationBuilder;
use crate::rng::SplitMix64;
use crate::routing::RoutingMatrix;
use crate::server::{Server, SharedServer};
use crate::Error;
use rand::SeedableRng;

/// An open queueing network: servers, an exogenous arrival process into
/// server 0, and routing between servers and the exit.
pub struct QueueSystem {
    pub(crate) servers: Vec<SharedServer>,
    pub(crate) arrival: Distribution,
    pub(crate) routing: RoutingMatrix,
    mean_response: f64,
    response_times: Vec<f64>,
    event_log: EventLog,
}

impl QueueSystem {
    /// External arrivals are drawn from `arrival` and enter the first
    /// server. With no routing matrix the network is a strict tandem.
    pub fn new(servers: Vec<SharedServer>, arrival: Distribution) -> Self {
        Self {
            servers,
            arrival,
            routing: RoutingMatrix::tandem(),
            mean_response: 0.0,
            response_times: Vec::new(),
            event_log: EventLog::new(),
        }
    }

    pub fn with_routing(mut self, routing: RoutingMatrix) -> Self {
        self.routing = routing;
        self
    }

    pub fn add_server(&mut self, server: SharedServer) {
        self.servers.push(server);
    }

    pub fn update_routing_matrix(&mut self, routing: RoutingMatrix) {
        self.routing = routing;
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn servers(&self) -> &[SharedServer] {
        &self.servers
    }

    /// Mean sojourn time of the last [`sim`](QueueSystem::sim) run.
    pub fn mean_response(&self) -> f64 {
        self.mean_response
    }

    /// Per-job sojourn times of the last run; empty unless
    /// [`SimBuilder::track_response_times`] was set.
    pub fn response_times(&self) -> &[f64] {
        &self.response_times
    }

    /// Event trace of the last run; empty unless
    /// [`SimBuilder::track_events`] was set.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Starts configuring a single simulation run.
    pub fn sim(&mut self) -> SimBuilder<'_> {
        SimBuilder {
            system: self,
            num_events: 1_000_000,
            seed: None,
            warmup: 0,
            track_response_times: false,
            track_events: false,
        }
    }

    /// Starts configuring a batch of independent replications.
    pub fn replicate(&self) -> ReplicationBuilder<'_> {
        ReplicationBuilder::new(self)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.servers.is_empty() {
            return Err(Error::NoServers);
        }
        self.routing.validate_for(self.servers.len())?;
        for server in &self.servers {
            let server = server.lock();
            if server.buffer_capacity() == Some(0) {
                return Err(Error::ZeroBufferCapacity);
            }
            if server.num_servers() == 0 {
                return Err(Error::ZeroServerCount);
            }
        }
        Ok(())
    }
}

/// Options for one simulation run. Created by [`QueueSystem::sim`].
pub struct SimBuilder<'a> {
    system: &'a mut QueueSystem,
    num_events: u64,
    seed: Option<u64>,
    warmup: u64,
    track_response_times: bool,
    track_events: bool,
}

impl SimBuilder<'_> {
    /// Number of jobs that must leave the network during the measurement
    /// phase. Defaults to 10^6.
    pub fn events(mut self, num_events: u64) -> Self {
        self.num_events = num_events;
        self
    }

    /// Fixes the RNG seed. Defaults to a fresh entropy draw.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of exits to discard before measuring, to reduce
    /// initialization bias. Defaults to 0.
    pub fn warmup(mut self, exits: u64) -> Self {
        self.warmup = exits;
        self
    }

    /// Records every departing job's sojourn time.
    pub fn track_response_times(mut self) -> Self {
        self.track_response_times = true;
        self
    }

    /// Records the full event trace.
    pub fn track_events(mut self) -> Self {
        self.track_events = true;
        self
    }

    /// Runs the simulation and returns `(mean_n, mean_t)`: the
    /// time-averaged number in system and the mean sojourn time over the
    /// measurement phase.
    pub fn run(self) -> Result<(f64, f64), Error> {
        self.system.validate()?;
        let seed = self.seed.unwrap_or_else(rand::random);
        log::debug!(
            "sim: events={} warmup={} seed={}",
            self.num_events,
            self.warmup,
            seed
        );

        let mut guards: Vec<MutexGuard<'_, Box<dyn Server>>> =
            self.system.servers.iter().map(|s| s.lock()).collect();
        let servers: Vec<&mut Box<dyn Server>> =
            guards.iter_mut().map(|g| &mut **g).collect();

        let mut simulation = Simulation::new(
            servers,
            self.system.arrival,
            &self.system.routing,
            seed,
            SimOptions {
                num_events: self.num_events,
                warmup: self.warmup,
                track_response_times: self.track_response_times,
                track_events: self.track_events,
            },
        );
        let estimates = simulation.run();
        let (response_times, event_log) = simulation.into_outputs();
        drop(guards);

        self.system.mean_response = estimates.mean_t;
        self.system.response_times = response_times;
        self.system.event_log = event_log;
        Ok((estimates.mean_n, estimates.mean_t))
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct SimOptions {
    pub num_events: u64,
    pub warmup: u64,
    pub track_response_times: bool,
    pub track_events: bool,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Estimates {
    pub mean_n: f64,
    pub mean_t: f64,
}

/// One simulation in flight: borrowed servers, a private RNG, and the
/// measurement accumulators. Strictly single-threaded.
pub(crate) struct Simulation<'a, 'b> {
    servers: Vec<&'a mut Box<dyn Server>>,
    arrival: Distribution,
    routing: &'b RoutingMatrix,
    rng: SplitMix64,
    options: SimOptions,
    clock: f64,
    time_to_next_arrival: f64,
    state_total: usize,
    area_n: f64,
    num_completions: u64,
    completed: Vec<usize>, // reused between steps
    response_times: Vec<f64>,
    event_log: EventLog,
}

impl<'a, 'b> Simulation<'a, 'b> {
    pub(crate) fn new(
        mut servers: Vec<&'a mut Box<dyn Server>>,
        arrival: Distribution,
        routing: &'b RoutingMatrix,
        seed: u64,
        options: SimOptions,
    ) -> Self {
        for server in &mut servers {
            server.reset();
        }
        let mut rng = SplitMix64::seed_from_u64(seed);
        let time_to_next_arrival = arrival.sample(&mut rng);
        let response_times = if options.track_response_times {
            Vec::with_capacity(options.num_events as usize)
        } else {
            Vec::new()
        };
        let event_log = if options.track_events {
            EventLog::with_capacity(2 * options.num_events as usize)
        } else {
            EventLog::new()
        };
        Self {
            servers,
            arrival,
            routing,
            rng,
            options,
            clock: 0.0,
            time_to_next_arrival,
            state_total: 0,
            area_n: 0.0,
            num_completions: 0,
            completed: Vec::new(),
            response_times,
            event_log,
        }
    }

    pub(crate) fn run(&mut self) -> Estimates {
        let mut warmed = 0;
        while warmed < self.options.warmup {
            warmed += self.step(false);
        }
        if self.options.warmup > 0 {
            // Loss probabilities are measured on the steady-state phase;
            // queue contents carry over untouched.
            for server in &mut self.servers {
                server.stats_mut().clear_loss_counters();
            }
            log::debug!("warmup done: {} exits by t={}", warmed, self.clock);
        }

        let measurement_start = self.clock;
        while self.num_completions < self.options.num_events {
            self.step(true);
        }
        let elapsed = self.clock - measurement_start;
        Estimates {
            mean_n: if elapsed > 0.0 {
                self.area_n / elapsed
            } else {
                0.0
            },
            mean_t: self.area_n / self.num_completions.max(1) as f64,
        }
    }

    pub(crate) fn into_outputs(self) -> (Vec<f64>, EventLog) {
        (self.response_times, self.event_log)
    }

    /// One pass: advance to the next event horizon, absorb the elapsed
    /// time at every server, route completions, then fire the external
    /// arrival if it was the horizon. Completions are processed before a
    /// simultaneous arrival. Returns how many jobs left the network
    /// (departures plus mid-network rejections).
    fn step(&mut self, measuring: bool) -> u64 {
        let ttnc_net = self
            .servers
            .iter()
            .fold(f64::INFINITY, |acc, s| acc.min(s.time_to_next_completion()));
        let dt = ttnc_net.min(self.time_to_next_arrival);

        self.clock += dt;
        if measuring {
            self.area_n += self.state_total as f64 * dt;
        }

        // Every server absorbs the elapsed time before any completion is
        // routed, so a routed job lands on a server whose clock has
        // already advanced and receives no service from this step.
        self.completed.clear();
        for i in 0..self.servers.len() {
            if self.servers[i].update(dt, &mut self.rng) {
                self.completed.push(i);
            }
        }
        let mut exits = 0;
        for k in 0..self.completed.len() {
            let from = self.completed[k];
            exits += self.route_completion(from, measuring);
        }

        if self.time_to_next_arrival <= ttnc_net {
            self.external_arrival(measuring);
            self.time_to_next_arrival = self.arrival.sample(&mut self.rng);
        } else {
            self.time_to_next_arrival -= dt;
        }
        exits
    }

    /// Routes the job that just completed at server `from`. Returns 1 if
    /// the job left the network (exit or dropped at a full buffer).
    fn route_completion(&mut self, from: usize, measuring: bool) -> u64 {
        let server_count = self.servers.len();
        let dest = self.routing.route(from, server_count, &mut self.rng);
        if dest >= server_count {
            self.state_total -= 1;
            if measuring {
                self.num_completions += 1;
                if self.options.track_response_times {
                    self.response_times
                        .push(self.servers[from].stats().last_response_time);
                }
                if self.options.track_events {
                    self.event_log.push(
                        self.clock,
                        EventKind::Departure,
                        from,
                        EXTERNAL,
                        self.state_total,
                    );
                }
            }
            return 1;
        }

        self.servers[dest].stats_mut().num_arrivals += 1;
        if self.servers[dest].is_full() {
            // Dropped mid-network: the job leaves with no departure
            // record.
            self.servers[dest].stats_mut().num_rejected += 1;
            self.state_total -= 1;
            if measuring {
                self.num_completions += 1;
                if self.options.track_events {
                    self.event_log.push(
                        self.clock,
                        EventKind::Rejection,
                        from,
                        dest,
                        self.state_total,
                    );
                }
            }
            1
        } else {
            self.servers[dest].arrival(&mut self.rng);
            if measuring && self.options.track_events {
                self.event_log
                    .push(self.clock, EventKind::Route, from, dest, self.state_total);
            }
            0
        }
    }

    fn external_arrival(&mut self, measuring: bool) {
        let entry = &mut self.servers[0];
        entry.stats_mut().num_arrivals += 1;
        if entry.is_full() {
            entry.stats_mut().num_rejected += 1;
            if measuring && self.options.track_events {
                self.event_log.push(
                    self.clock,
                    EventKind::Rejection,
                    EXTERNAL,
                    0,
                    self.state_total,
                );
            }
        } else {
            self.state_total += 1;
            entry.arrival(&mut self.rng);
            if measuring && self.options.track_events {
                self.event_log
                    .push(self.clock, EventKind::Arrival, EXTERNAL, 0, self.state_total);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::*;
    use crate::{shared, Distribution, Fcfs, ForegroundBackground, ProcessorSharing, Srpt};

    #[test]
    fn rejects_invalid_configurations() {
        let mut no_servers = QueueSystem::new(vec![], exp(1.0));
        assert_eq!(no_servers.sim().run().unwrap_err(), Error::NoServers);

        let mut zero_buffer = single(shared(Fcfs::new(exp(1.0)).with_buffer(0)), 1.0);
        assert_eq!(
            zero_buffer.sim().run().unwrap_err(),
            Error::ZeroBufferCapacity
        );

        let mut zero_servers = single(shared(Fcfs::new(exp(1.0)).with_servers(0)), 1.0);
        assert_eq!(
            zero_servers.sim().run().unwrap_err(),
            Error::ZeroServerCount
        );

        let two_rows =
            RoutingMatrix::new(vec![vec![0.0, 0.5, 0.5], vec![0.0, 0.0, 1.0]]).unwrap();
        let mut mismatched = mm1(1.0, 2.0).with_routing(two_rows);
        assert!(matches!(
            mismatched.sim().run(),
            Err(Error::RoutingRowCount {
                expected: 1,
                actual: 2,
            })
        ));
    }

    #[test]
    fn identical_seeds_reproduce_bit_identical_runs() {
        let run = |seed: u64| {
            let mut system = mm1(1.0, 2.0);
            let estimates = system
                .sim()
                .events(20_000)
                .seed(seed)
                .warmup(500)
                .track_response_times()
                .track_events()
                .run()
                .unwrap();
            (
                estimates,
                system.response_times().to_vec(),
                system.event_log().times().to_vec(),
            )
        };
        let (first, first_times, first_log) = run(42);
        let (second, second_times, second_log) = run(42);
        assert_eq!(first, second);
        assert_eq!(first_times, second_times);
        assert_eq!(first_log, second_log);

        let (other, ..) = run(43);
        assert_ne!(first, other);
    }

    #[test]
    fn untracked_runs_record_nothing() {
        let mut system = mm1(1.0, 2.0);
        system.sim().events(5_000).seed(1).run().unwrap();
        assert!(system.response_times().is_empty());
        assert!(system.event_log().is_empty());
        assert!(system.mean_response() > 0.0);
    }

    #[test]
    fn response_times_match_the_mean_estimate() {
        let mut system = mm1(1.0, 2.0);
        let (_, mean_t) = system
            .sim()
            .events(50_000)
            .seed(9)
            .track_response_times()
            .run()
            .unwrap();
        let times = system.response_times();
        assert_eq!(times.len(), 50_000);
        assert!(times.iter().all(|&t| t > 0.0));
        let sample_mean = times.iter().sum::<f64>() / times.len() as f64;
        assert!(relative_error(sample_mean, mean_t) < 0.05);
        assert_eq!(system.mean_response(), mean_t);
    }

    #[test]
    fn event_log_replays_to_consistent_populations() {
        // A lossy tandem so every event kind appears.
        let mut system = QueueSystem::new(
            vec![
                shared(Fcfs::new(exp(2.0))),
                shared(Fcfs::new(exp(2.0)).with_buffer(1)),
            ],
            exp(1.5),
        );
        system
            .sim()
            .events(20_000)
            .seed(5)
            .track_events()
            .run()
            .unwrap();
        let log = system.event_log();
        assert_eq!(log.times().len(), log.kinds().len());
        assert_eq!(log.times().len(), log.from_servers().len());
        assert_eq!(log.times().len(), log.to_servers().len());
        assert_eq!(log.times().len(), log.states().len());

        let mut population: i64 = 0;
        let mut last_time = 0.0;
        let mut saw_route = false;
        let mut saw_rejection = false;
        for event in log.iter() {
            assert!(event.time >= last_time);
            last_time = event.time;
            population += match event.kind {
                EventKind::Arrival => 1,
                EventKind::Route => 0,
                EventKind::Departure => -1,
                // An external arrival bounced off a full entry never
                // entered; a mid-network drop leaves the system.
                EventKind::Rejection => {
                    saw_rejection = true;
                    if event.from == EXTERNAL {
                        0
                    } else {
                        -1
                    }
                }
            };
            if event.kind == EventKind::Route {
                saw_route = true;
            }
            assert!(population >= 0);
            assert_eq!(population as usize, event.state_after);
        }
        assert!(saw_route);
        assert!(saw_rejection);
    }

    #[test]
    fn warmup_shifts_the_measured_window() {
        let run = |warmup: u64| {
            let mut system = mm1(1.0, 2.0);
            system
                .sim()
                .events(10_000)
                .seed(3)
                .warmup(warmup)
                .run()
                .unwrap()
        };
        assert_eq!(run(1_000), run(1_000));
        assert_ne!(run(1_000), run(0));
    }

    #[test]
    fn observed_throughput_matches_the_arrival_rate() {
        let mut system = mm1(1.0, 2.0);
        let (mean_n, mean_t) = system
            .sim()
            .events(100_000)
            .seed(11)
            .warmup(1_000)
            .run()
            .unwrap();
        // Little's law: the ratio of the two estimates is the throughput,
        // which for a loss-free queue is the arrival rate.
        assert!(relative_error(mean_n / mean_t, 1.0) < 0.05);
    }

    #[test]
    fn counters_remain_readable_through_shared_handles() {
        let server = shared(Fcfs::new(exp(2.0)));
        let mut system = single(server.clone(), 1.0);
        system.sim().events(10_000).seed(2).run().unwrap();

        let guard = server.lock();
        let stats = guard.stats();
        assert_eq!(stats.num_completions, 10_000);
        assert!(stats.num_arrivals >= 10_000);
        assert!(stats.clock > 0.0);
        assert!(stats.mean_response() > 0.0);
        let utilization = stats.utilization();
        assert!(utilization > 0.0 && utilization < 1.0);
    }

    #[test]
    fn tandem_forwards_every_completion_downstream() {
        let first = shared(Fcfs::new(exp(4.0)));
        let second = shared(Srpt::new(exp(4.0)));
        let mut system = QueueSystem::new(vec![first.clone(), second.clone()], exp(1.0));
        system.sim().events(5_000).seed(8).run().unwrap();

        assert_eq!(
            first.lock().stats().num_completions,
            second.lock().stats().num_arrivals
        );
        assert_eq!(second.lock().stats().num_completions, 5_000);
        assert_eq!(second.lock().stats().num_rejected, 0);
    }

    #[cfg(not(debug_assertions))] // too slow for debug builds
    mod analytical {
        use super::*;
        use crate::RoutingMatrix;

        const EVENTS: u64 = 1_000_000;
        const WARMUP: u64 = 10_000;
        const SEED: u64 = 42;

        fn measure(system: &mut QueueSystem) -> (f64, f64) {
            let _ = env_logger::builder().is_test(true).try_init();
            system
                .sim()
                .events(EVENTS)
                .seed(SEED)
                .warmup(WARMUP)
                .run()
                .unwrap()
        }

        #[test]
        fn mm1_fcfs_matches_theory() {
            // lambda 1, mu 2: E[T] = 1/(mu - lambda) = 1, E[N] = rho/(1-rho) = 1.
            let (mean_n, mean_t) = measure(&mut mm1(1.0, 2.0));
            assert!((mean_t - 1.0).abs() < 0.05, "mean_t={mean_t}");
            assert!(relative_error(mean_n, 1.0) < 0.05, "mean_n={mean_n}");
        }

        #[test]
        fn srpt_improves_on_fcfs_under_exponential_service() {
            let mut system = single(shared(Srpt::new(exp(2.0))), 1.0);
            let (mean_n, mean_t) = measure(&mut system);
            assert!(mean_t < 1.0, "mean_t={mean_t}");
            assert!(mean_t > 0.5, "mean_t={mean_t}");
            assert!(relative_error(mean_n / mean_t, 1.0) < 0.05);
        }

        #[test]
        fn ps_matches_mm1_mean_response() {
            let mut system = single(shared(ProcessorSharing::new(exp(2.0))), 1.0);
            let (_, mean_t) = measure(&mut system);
            assert!(relative_error(mean_t, 1.0) < 0.05, "mean_t={mean_t}");
        }

        #[test]
        fn fb_matches_mm1_mean_response() {
            let mut system = single(shared(ForegroundBackground::new(exp(2.0))), 1.0);
            let (_, mean_t) = measure(&mut system);
            assert!(relative_error(mean_t, 1.0) < 0.05, "mean_t={mean_t}");
        }

        #[test]
        fn mg1_ps_depends_only_on_the_mean() {
            // Uniform service, rho = 0.5: E[T] = E[S]/(1 - rho) = 1.
            let service = Distribution::uniform(0.2, 0.8).unwrap();
            let mut system = single(shared(ProcessorSharing::new(service)), 1.0);
            let (_, mean_t) = measure(&mut system);
            assert!(relative_error(mean_t, 1.0) < 0.05, "mean_t={mean_t}");
        }

        #[test]
        fn mg1_ps_is_insensitive_to_heavy_tails() {
            let service = Distribution::bounded_pareto(0.5, 5.0, 2.0).unwrap();
            let lambda = 0.55;
            let rho = lambda * service.mean();
            let expected = service.mean() / (1.0 - rho);
            let mut system = QueueSystem::new(
                vec![shared(ProcessorSharing::new(service))],
                exp(lambda),
            );
            let (_, mean_t) = measure(&mut system);
            assert!(
                relative_error(mean_t, expected) < 0.05,
                "mean_t={mean_t}, expected={expected}"
            );
        }

        #[test]
        fn mg1_fcfs_matches_pollaczek_khinchine() {
            let service = Distribution::uniform(0.2, 0.8).unwrap();
            let lambda = 1.0;
            let rho = lambda * service.mean();
            let expected =
                service.mean() + lambda * service.mean_square() / (2.0 * (1.0 - rho));
            let mut system = QueueSystem::new(vec![shared(Fcfs::new(service))], exp(lambda));
            let (_, mean_t) = measure(&mut system);
            assert!(
                relative_error(mean_t, expected) < 0.05,
                "mean_t={mean_t}, expected={expected}"
            );
        }

        #[test]
        fn mmk_fcfs_matches_erlang_c() {
            let server = shared(Fcfs::new(exp(1.0)).with_servers(3));
            let mut system = single(server, 2.0);
            let (_, mean_t) = measure(&mut system);
            let expected = erlang_c_mean_t(3, 2.0, 1.0);
            assert!(
                relative_error(mean_t, expected) < 0.05,
                "mean_t={mean_t}, expected={expected}"
            );
        }

        #[test]
        fn mmcc_loss_matches_erlang_b() {
            let server = shared(Fcfs::new(exp(1.0)).with_servers(3).with_buffer(3));
            let mut system = single(server.clone(), 2.0);
            measure(&mut system);
            let loss = server.lock().stats().loss_probability();
            let expected = erlang_b(3, 2.0);
            assert!(
                relative_error(loss, expected) < 0.01,
                "loss={loss}, expected={expected}"
            );
        }

        #[test]
        fn mm1k_loss_matches_theory() {
            let server = shared(Fcfs::new(exp(2.0)).with_buffer(5));
            let mut system = single(server.clone(), 1.0);
            let (mean_n, mean_t) = measure(&mut system);
            let rho: f64 = 0.5;
            let expected = (1.0 - rho) * rho.powi(5) / (1.0 - rho.powi(6));
            let loss = server.lock().stats().loss_probability();
            // Sampling error of the loss estimate at this event count is
            // just under one percent of its value.
            assert!(
                relative_error(loss, expected) < 0.03,
                "loss={loss}, expected={expected}"
            );
            // Little's law with the effective (admitted) arrival rate.
            let lambda_eff = 1.0 * (1.0 - expected);
            assert!(relative_error(mean_n, lambda_eff * mean_t) < 0.05);
        }

        #[test]
        fn tandem_stage_sojourns_sum_to_the_system_sojourn() {
            let first = shared(Fcfs::new(exp(4.0)));
            let second = shared(Srpt::new(exp(4.0)));
            let mut system =
                QueueSystem::new(vec![first.clone(), second.clone()], exp(1.0));
            let (_, mean_t) = measure(&mut system);
            let staged =
                first.lock().stats().mean_response() + second.lock().stats().mean_response();
            assert!(
                relative_error(mean_t, staged) < 0.05,
                "mean_t={mean_t}, staged={staged}"
            );
        }

        #[test]
        fn feedback_loop_matches_theory() {
            // 30% of completions loop back: 1/(1-0.3) visits per job at an
            // effective load of 0.7143, so E[T] = 1.4286 * 1.75 = 2.5.
            let server = shared(ProcessorSharing::new(exp(2.0)));
            let routing = RoutingMatrix::new(vec![vec![0.3, 0.7]]).unwrap();
            let mut system = single(server.clone(), 1.0).with_routing(routing);
            let (_, mean_t) = measure(&mut system);
            assert!(relative_error(mean_t, 2.5) < 0.05, "mean_t={mean_t}");
            let utilization = server.lock().stats().utilization();
            assert!(
                (utilization - 0.7143).abs() < 0.02,
                "utilization={utilization}"
            );
        }
    }
}
