use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::AppResult;
use crate::metrics::RequestResult;

use super::{HttpClient, RateLimiter};

/// One worker's request loop: pull a URL, wait for a permit, issue the GET and
/// emit the result downstream.
#[derive(Clone)]
pub struct RequestStage {
    pub worker_id: usize,
    pub client: Arc<dyn HttpClient>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub cancel: CancellationToken,
}

impl RequestStage {
    /// Processes URLs until the input is exhausted or the run is cancelled and
    /// returns how many results were emitted.
    ///
    /// A URL pulled while cancellation fires is dropped without a result.
    ///
    /// # Errors
    ///
    /// Returns the first request error; the stage stops there.
    pub async fn run(
        &self,
        urls: &flume::Receiver<String>,
        out: &mpsc::Sender<RequestResult>,
    ) -> AppResult<u64> {
        let mut emitted: u64 = 0;
        loop {
            let url = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                next = urls.recv_async() => match next {
                    Ok(url) => url,
                    Err(_) => break,
                },
            };

            if let Some(limiter) = self.rate_limiter.as_ref()
                && !limiter.acquire(&self.cancel).await
            {
                break;
            }

            let result = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                outcome = self.client.get(&url) => outcome?,
            };

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                sent = out.send(result) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
            emitted = emitted.saturating_add(1);
        }

        debug!(
            worker_id = self.worker_id,
            emitted, "Request stage drained"
        );
        Ok(emitted)
    }
}
