use serde::Serialize;

use super::ResultSet;

/// Percentiles rendered in the response-time section of the report.
pub const REPORTED_PERCENTILES: [u8; 7] = [10, 25, 50, 75, 90, 95, 99];
/// Divisor turning a whole percentile into a quantile.
const PERCENT_DIVISOR: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PercentileValue {
    pub percentile: u8,
    pub secs: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatencyPercentiles {
    pub values: Vec<PercentileValue>,
}

impl LatencyPercentiles {
    /// Returns `None` for an empty result set.
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Option<Self> {
        let mut sorted = results.timings_secs();
        sorted.sort_unstable_by(f64::total_cmp);

        let mut values = Vec::with_capacity(REPORTED_PERCENTILES.len());
        for pct in REPORTED_PERCENTILES {
            let secs = percentile(&sorted, f64::from(pct))?;
            values.push(PercentileValue {
                percentile: pct,
                secs,
            });
        }
        Some(Self { values })
    }

    #[must_use]
    pub fn get(&self, pct: u8) -> Option<f64> {
        self.values
            .iter()
            .find(|value| value.percentile == pct)
            .map(|value| value.secs)
    }
}

/// Linearly interpolated percentile over an ascending sample.
///
/// The rank is `pct / 100 * (n - 1)`; a fractional rank interpolates between
/// the two neighbouring order statistics. `pct` is clamped to `0..=100`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "latency statistics are floating point seconds")]
pub fn percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let quantile = (pct / PERCENT_DIVISOR).clamp(0.0, 1.0);
    let rank = quantile * last as f64;

    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;
    let lower = *sorted.get(lower_idx)?;
    let upper = *sorted.get(upper_idx.min(last))?;
    let fraction = rank - lower_idx as f64;

    Some(lower + (upper - lower) * fraction)
}
