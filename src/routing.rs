//! Probabilistic routing between servers and the system exit.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::SplitMix64;
use crate::Error;

const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Row-stochastic routing: entry `[i][j]` is the probability that a job
/// completing at server `i` goes to server `j`, with column `n` (one past
/// the last server) meaning the system exit.
///
/// The empty matrix is the strict tandem: server `i` forwards to `i + 1`
/// and the last server exits, with no randomness consumed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingMatrix {
    rows: Vec<Vec<f64>>,
}

impl RoutingMatrix {
    /// The deterministic tandem routing used when no matrix is given.
    pub fn tandem() -> Self {
        Self::default()
    }

    /// Validates shape and stochasticity: `n` rows of `n + 1` nonnegative
    /// entries, each row summing to 1 within 1e-9. The row count is
    /// checked against the actual server count when a run starts.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n + 1 {
                return Err(Error::RoutingRowLength {
                    row: i,
                    expected: n + 1,
                    actual: row.len(),
                });
            }
            if row.iter().any(|&p| p < 0.0) {
                return Err(Error::NegativeRoutingProbability { row: i });
            }
            let sum: f64 = row.iter().sum();
            if !((sum - 1.0).abs() <= ROW_SUM_TOLERANCE) {
                return Err(Error::RoutingRowSum { row: i, sum });
            }
        }
        Ok(Self { rows })
    }

    pub fn is_tandem(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn validate_for(&self, server_count: usize) -> Result<(), Error> {
        if !self.is_tandem() && self.rows.len() != server_count {
            return Err(Error::RoutingRowCount {
                expected: server_count,
                actual: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Picks the destination for a job completing at `from`. Returns
    /// `server_count` for the exit. Consumes exactly one uniform, except
    /// under tandem routing which consumes none.
    pub(crate) fn route(&self, from: usize, server_count: usize, rng: &mut SplitMix64) -> usize {
        if self.is_tandem() {
            return from + 1;
        }
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (j, p) in self.rows[from].iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                return j;
            }
        }
        // The row sums to 1 only within tolerance; a draw can slip past
        // the last prefix. Send the job out of the system.
        log::debug!("routing draw {draw} fell through row {from}; defaulting to exit");
        server_count
    }
}
