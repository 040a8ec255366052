//! Shared fixtures and closed-form queueing formulas for the statistical
//! tests.

use crate::{shared, Distribution, Fcfs, QueueSystem, SharedServer};

pub fn exp(rate: f64) -> Distribution {
    Distribution::exponential(rate).unwrap()
}

/// An M/M/1 FCFS system with arrival rate `lambda` and service rate `mu`.
pub fn mm1(lambda: f64, mu: f64) -> QueueSystem {
    QueueSystem::new(vec![shared(Fcfs::new(exp(mu)))], exp(lambda))
}

/// A single-server system around an arbitrary policy.
pub fn single(server: SharedServer, lambda: f64) -> QueueSystem {
    QueueSystem::new(vec![server], exp(lambda))
}

pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs()
}

/// Erlang-B blocking probability for `c` servers at offered load `a`,
/// via the standard recursion.
pub fn erlang_b(c: usize, a: f64) -> f64 {
    let mut b = 1.0;
    for j in 1..=c {
        b = a * b / (j as f64 + a * b);
    }
    b
}

/// Mean sojourn time of an M/M/k FCFS queue from the Erlang-C delay
/// probability.
pub fn erlang_c_mean_t(k: usize, lambda: f64, mu: f64) -> f64 {
    let a = lambda / mu;
    let b = erlang_b(k, a);
    let c = k as f64 * b / (k as f64 - a * (1.0 - b));
    1.0 / mu + c / (k as f64 * mu - lambda)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn erlang_formulas_match_textbook_values() {
        assert!((erlang_b(3, 2.0) - 0.2105).abs() < 1e-3);
        assert!((erlang_b(1, 1.0) - 0.5).abs() < 1e-12);
        // M/M/3 with lambda=2, mu=1: C ≈ 0.4444, E[T] ≈ 1.4444.
        assert!((erlang_c_mean_t(3, 2.0, 1.0) - 1.4444).abs() < 1e-3);
        // M/M/1 reduces to 1/(mu - lambda).
        assert!((erlang_c_mean_t(1, 1.0, 2.0) - 1.0).abs() < 1e-12);
    }
}
