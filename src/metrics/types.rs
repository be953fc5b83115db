use std::time::Duration;

use tokio::time::Instant;

/// Outcome of one completed request: the response status and the time it
/// took to receive the response headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestResult {
    pub status: u16,
    pub timing: Duration,
}

impl RequestResult {
    #[must_use]
    pub fn new(start: Instant, status: u16) -> Self {
        Self {
            status,
            timing: start.elapsed(),
        }
    }

    #[must_use]
    pub const fn from_parts(status: u16, timing: Duration) -> Self {
        Self { status, timing }
    }
}

/// Append-only collection of results owned by the sink for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet {
    results: Vec<RequestResult>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: RequestResult) {
        self.results.push(result);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RequestResult> {
        self.results.iter()
    }

    /// Timings in seconds, in collection order.
    #[must_use]
    pub fn timings_secs(&self) -> Vec<f64> {
        self.results
            .iter()
            .map(|result| result.timing.as_secs_f64())
            .collect()
    }
}

impl FromIterator<RequestResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = RequestResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a RequestResult;
    type IntoIter = std::slice::Iter<'a, RequestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
