use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::AppError;
use crate::metrics::RequestResult;

use super::{HttpClient, RateLimiter, RequestStage};

/// Launches `n_workers` request stages that share one URL input.
///
/// Every result lands on the returned result receiver and every fatal stage
/// error on the error receiver. The result sequence closes when the last
/// worker exits; the error sequence closes once all workers have been joined.
pub fn spawn_workers(
    n_workers: usize,
    urls: flume::Receiver<String>,
    client: Arc<dyn HttpClient>,
    rate_limiter: Option<Arc<RateLimiter>>,
    cancel: &CancellationToken,
) -> (mpsc::Receiver<RequestResult>, mpsc::Receiver<AppError>) {
    let workers = n_workers.max(1);
    let (results_tx, results_rx) = mpsc::channel::<RequestResult>(workers);
    // One slot per worker: each reports at most one fatal error.
    let (errors_tx, errors_rx) = mpsc::channel::<AppError>(workers);

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let stage = RequestStage {
            worker_id,
            client: Arc::clone(&client),
            rate_limiter: rate_limiter.clone(),
            cancel: cancel.clone(),
        };
        let urls = urls.clone();
        let results_tx = results_tx.clone();
        let errors_tx = errors_tx.clone();

        handles.push(tokio::spawn(async move {
            if let Err(err) = stage.run(&urls, &results_tx).await {
                debug!(worker_id, "Request stage failed: {}", err);
                report_error(&errors_tx, err);
            }
        }));
    }
    drop(results_tx);
    drop(urls);

    tokio::spawn(async move {
        for outcome in join_all(handles).await {
            if let Err(err) = outcome
                && err.is_panic()
            {
                error!("Request worker panicked: {}", err);
                report_error(&errors_tx, AppError::from(err));
            }
        }
    });

    (results_rx, errors_rx)
}

fn report_error(errors_tx: &mpsc::Sender<AppError>, err: AppError) {
    if let Err(send_err) = errors_tx.try_send(err) {
        debug!("Dropped stage error: {}", send_err);
    }
}
