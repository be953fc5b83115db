use tokio::sync::mpsc;

use super::ErrorReceiver;

/// Fans any number of error sequences into one.
///
/// The merged sequence holds one error per input, so a stage can always report
/// and shut down without a reader. It closes once every input has closed.
/// Forwarders stop as soon as the merged receiver is dropped.
#[must_use]
pub fn merge_errors(inputs: Vec<ErrorReceiver>) -> ErrorReceiver {
    let (merged_tx, merged_rx) = mpsc::channel(inputs.len().max(1));
    for mut input in inputs {
        let merged_tx = merged_tx.clone();
        tokio::spawn(async move {
            while let Some(err) = input.recv().await {
                if merged_tx.send(err).await.is_err() {
                    break;
                }
            }
        });
    }
    merged_rx
}
