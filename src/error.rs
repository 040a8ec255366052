//! Validation failures surfaced before a simulation starts.

/// Every way constructing or starting a simulation can fail.
///
/// All variants are fatal and are raised before the first RNG draw. Once
/// the event loop is running the only remaining failure mode, a routing
/// draw slipping past an imperfect row sum, is handled deterministically
/// by sending the job to the exit.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("exponential rate must be positive, got {rate}")]
    NonPositiveRate { rate: f64 },

    #[error("uniform bounds must satisfy low <= high, got [{low}, {high}]")]
    InvertedUniformBounds { low: f64, high: f64 },

    #[error("bounded Pareto requires 0 < low < high, got [{low}, {high}]")]
    InvalidParetoBounds { low: f64, high: f64 },

    #[error("bounded Pareto shape must be positive, got {shape}")]
    NonPositiveParetoShape { shape: f64 },

    #[error("routing matrix must have one row per server: expected {expected}, got {actual}")]
    RoutingRowCount { expected: usize, actual: usize },

    #[error("routing row {row} must have {expected} entries (servers + exit), got {actual}")]
    RoutingRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("routing row {row} sums to {sum}, expected 1 within 1e-9")]
    RoutingRowSum { row: usize, sum: f64 },

    #[error("routing row {row} contains a negative probability")]
    NegativeRoutingProbability { row: usize },

    #[error("a buffer capacity of 0 would reject every job; use a capacity of at least 1")]
    ZeroBufferCapacity,

    #[error("server count must be at least 1")]
    ZeroServerCount,

    #[error("the system has no servers")]
    NoServers,

    #[error("replication count must be at least 1")]
    ZeroReplications,

    #[error("confidence interval requires at least 2 samples, got {actual}")]
    TooFewSamples { actual: usize },

    #[error("confidence level must lie in (0, 1), got {confidence}")]
    InvalidConfidence { confidence: f64 },
}
