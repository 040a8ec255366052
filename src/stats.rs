//! Output statistics: sample moments and Student-t confidence intervals.
//!
//! Replication outputs are plain `Vec<f64>`s; the helpers here turn them
//! into interval estimates. The t-quantile is computed in-crate (inverse
//! normal plus a Cornish–Fisher correction) rather than pulled from a
//! statistics dependency; the approximation is well inside 0.5% of tables
//! for 10 or more replications.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A symmetric interval estimate: `mean ± half_width` at the given
/// confidence level.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub half_width: f64,
    pub confidence: f64,
}

impl ConfidenceInterval {
    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower() <= value && value <= self.upper()
    }
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation with the n−1 divisor.
pub fn sample_std(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let ss: f64 = samples.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// The two-sided Student-t interval `mean ± t · s / sqrt(n)` over
/// independent replication outputs.
pub fn confidence_interval(samples: &[f64], confidence: f64) -> Result<ConfidenceInterval, Error> {
    if samples.len() < 2 {
        return Err(Error::TooFewSamples {
            actual: samples.len(),
        });
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::InvalidConfidence { confidence });
    }
    let n = samples.len() as f64;
    let t = t_quantile(1.0 - (1.0 - confidence) / 2.0, n - 1.0);
    Ok(ConfidenceInterval {
        mean: mean(samples),
        half_width: t * sample_std(samples) / n.sqrt(),
        confidence,
    })
}

/// Student-t quantile via a Cornish–Fisher expansion around the normal
/// quantile in powers of 1/df.
fn t_quantile(p: f64, df: f64) -> f64 {
    let z = normal_quantile(p);
    let z2 = z * z;
    let z3 = z2 * z;
    let z5 = z3 * z2;
    let z7 = z5 * z2;
    let z9 = z7 * z2;
    z + (z3 + z) / (4.0 * df)
        + (5.0 * z5 + 16.0 * z3 + 3.0 * z) / (96.0 * df * df)
        + (3.0 * z7 + 19.0 * z5 + 17.0 * z3 - 15.0 * z) / (384.0 * df * df * df)
        + (79.0 * z9 + 776.0 * z7 + 1482.0 * z5 - 1920.0 * z3 - 945.0 * z)
            / (92160.0 * df * df * df * df)
}

/// Acklam's rational approximation to the standard normal quantile.
/// Relative error below 1.2e-9 over the open unit interval.
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    debug_assert!(p > 0.0 && p < 1.0);
    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -normal_quantile(1.0 - p)
    }
}
