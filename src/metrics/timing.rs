use serde::Serialize;

use super::ResultSet;

/// Aggregate latency figures, all in seconds.
///
/// `requests_per_sec` is `1 / average_secs`: the rate a single client would
/// reach issuing these requests back to back. It ignores the worker count and
/// the wall-clock span of the run, so it is not the measured aggregate QPS of
/// a concurrent run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimingSummary {
    pub total_secs: f64,
    pub slowest_secs: f64,
    pub fastest_secs: f64,
    pub average_secs: f64,
    pub requests_per_sec: f64,
}

impl TimingSummary {
    /// Returns `None` for an empty result set.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "latency statistics are floating point seconds")]
    pub fn from_results(results: &ResultSet) -> Option<Self> {
        let mut timings = results.iter().map(|result| result.timing.as_secs_f64());
        let first = timings.next()?;

        let mut total = first;
        let mut slowest = first;
        let mut fastest = first;
        for timing in timings {
            total += timing;
            slowest = slowest.max(timing);
            fastest = fastest.min(timing);
        }

        let count = results.len() as f64;
        let average = total / count;
        let requests_per_sec = if average > 0.0 { 1.0 / average } else { 0.0 };

        Some(Self {
            total_secs: total,
            slowest_secs: slowest,
            fastest_secs: fastest,
            average_secs: average,
            requests_per_sec,
        })
    }
}
