// 📊 Order statistics over a bucket of amounts
//
// Percentiles use linear interpolation between closest ranks:
//   rank = p / 100 * (n - 1)
//   value = sorted[floor(rank)] + (sorted[ceil(rank)] - sorted[floor(rank)]) * frac(rank)

use anyhow::{bail, Result};
use std::fmt;

// ============================================================================
// PERCENTILE
// ============================================================================

/// A percentile in the closed range [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentile(f64);

impl Percentile {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            bail!("Percentile must be between 0 and 100 (got {})", value);
        }
        Ok(Percentile(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Always keeps a decimal point: `50` displays as `50.0`, `95.5` as `95.5`.
/// Values below 1e-4 use exponent form with a signed two-digit exponent (`1e-05`).
impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 != 0.0 && self.0 < 1e-4 {
            let sci = format!("{:e}", self.0);
            let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
            let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
            let sign = if exponent < 0 { '-' } else { '+' };
            return write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs());
        }
        write!(f, "{:?}", self.0)
    }
}

/// Linear-interpolation percentile. Returns `None` for an empty sample.
pub fn percentile_linear(amounts: &[f64], percentile: Percentile) -> Option<f64> {
    if amounts.is_empty() {
        return None;
    }

    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = percentile.value() / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

// ============================================================================
// WEEKLY STATS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub percentile: f64,
    pub count: usize,
    pub total: f64,
    pub average: f64,
}

impl WeeklyStats {
    /// Unrounded statistics for one bucket; `None` if the bucket is empty
    pub fn compute(amounts: &[f64], percentile: Percentile) -> Option<Self> {
        let value = percentile_linear(amounts, percentile)?;
        let total: f64 = amounts.iter().sum();
        let count = amounts.len();

        Some(WeeklyStats {
            percentile: value,
            count,
            total,
            average: total / count as f64,
        })
    }
}
