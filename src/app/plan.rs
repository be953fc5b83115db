use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::args::{LoadArgs, OutputFormat, PositiveU64};
use crate::error::{AppError, AppResult, ValidationError};
use crate::pipeline::{ErrorReceiver, RunConfig, UrlReceiver};
use crate::source::UrlSource;

/// Requests issued when neither a request count nor a duration bounds a run.
pub const DEFAULT_REQUESTS: u64 = 200;

/// Validated settings of one command-line run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadPlan {
    pub source: UrlSource,
    pub workers: usize,
    pub max_qps: u64,
    pub duration: Option<Duration>,
    pub timeout: Duration,
    pub output_format: OutputFormat,
}

impl LoadPlan {
    /// # Errors
    ///
    /// Returns an error when no target is set or the URL file cannot be used.
    pub fn from_args(args: &LoadArgs) -> AppResult<Self> {
        let target = args
            .url
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        let requests = args.requests.map(PositiveU64::get);

        let source = if args.urls_from_file {
            UrlSource::from_file(Path::new(target), requests)?
        } else {
            let count = match (requests, args.duration) {
                (Some(requests), _) => Some(requests),
                (None, Some(_)) => None,
                (None, None) => Some(DEFAULT_REQUESTS),
            };
            UrlSource::Repeat {
                url: target.to_owned(),
                count,
            }
        };

        Ok(Self {
            source,
            workers: args.workers.get(),
            max_qps: args.qps,
            duration: args.duration,
            timeout: args.timeout,
            output_format: args.output_format,
        })
    }
}

impl RunConfig for LoadPlan {
    fn max_qps(&self) -> u64 {
        self.max_qps
    }

    fn n_workers(&self) -> usize {
        self.workers
    }

    fn app_duration(&self) -> Option<Duration> {
        self.duration
    }

    fn requests_source(
        &self,
        cancel: &CancellationToken,
    ) -> AppResult<(UrlReceiver, ErrorReceiver)> {
        Ok(self.source.clone().spawn(self.workers, cancel))
    }
}
