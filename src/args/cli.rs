use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_u64, parse_positive_usize};
use super::types::{OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator: fires GET requests from a pool of workers and reports status codes, timings and latency percentiles."
)]
pub struct LoadArgs {
    /// Target URL (a file of URLs, one per line, with --urls-from-file)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value = "10", value_parser = parse_positive_usize)]
    pub workers: PositiveUsize,

    /// Total number of requests to send (defaults to 200 when no duration is set)
    #[arg(long, short = 'n', value_parser = parse_positive_u64)]
    pub requests: Option<PositiveU64>,

    /// Run duration (supports ms/s/m/h); unbounded request stream until it elapses
    #[arg(long, short = 'd', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Maximum requests per second across all workers (0 = unlimited)
    #[arg(long, short = 'q', default_value_t = 0)]
    pub qps: u64,

    /// Treat URL as a path to a file containing one URL per line
    #[arg(long = "urls-from-file")]
    pub urls_from_file: bool,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, short = 't', default_value = "20s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Report format
    #[arg(long = "output-format", short = 'o', default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Path to a TOML or JSON config file (defaults to ./httpload.toml or ./httpload.json)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
