use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Shared URL input of a run; every URL is delivered to exactly one worker.
pub type UrlReceiver = flume::Receiver<String>;
/// Fatal errors reported by one pipeline stage.
pub type ErrorReceiver = mpsc::Receiver<AppError>;

/// Read-only settings a run is driven by.
pub trait RunConfig: Send + Sync {
    /// Aggregate request rate cap; 0 disables rate limiting.
    fn max_qps(&self) -> u64;

    /// Number of concurrent request workers, at least 1.
    fn n_workers(&self) -> usize;

    /// Run deadline; `None` bounds the run only by its input or cancellation.
    fn app_duration(&self) -> Option<Duration>;

    /// Starts the URL producer for one run. The producer must stop when
    /// `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be started.
    fn requests_source(
        &self,
        cancel: &CancellationToken,
    ) -> AppResult<(UrlReceiver, ErrorReceiver)>;
}
