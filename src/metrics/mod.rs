//! Result collection types and the statistics computed over a finished run.
mod percentiles;
mod report;
mod status;
mod timing;
mod types;


pub use percentiles::{LatencyPercentiles, PercentileValue, REPORTED_PERCENTILES, percentile};
pub use report::Report;
pub use status::{StatusCount, status_distribution};
pub use timing::TimingSummary;
pub use types::{RequestResult, ResultSet};
