use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::metrics::{RequestResult, ResultSet};

/// Appends every result to a fresh [`ResultSet`] until the input closes or
/// `cancel` fires.
///
/// Results already buffered when cancellation fires are still kept; nothing
/// is awaited after that point.
pub async fn collect_results(
    mut results: mpsc::Receiver<RequestResult>,
    cancel: CancellationToken,
) -> ResultSet {
    let mut collected = ResultSet::new();
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                while let Ok(result) = results.try_recv() {
                    collected.push(result);
                }
                break;
            }
            next = results.recv() => match next {
                Some(result) => collected.push(result),
                None => break,
            },
        }
    }
    debug!(collected = collected.len(), "Result sink closed");
    collected
}
