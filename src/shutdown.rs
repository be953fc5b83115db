use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Cancels `cancel` on Ctrl+C or SIGTERM. The task exits once the token is
/// cancelled for any reason.
pub fn setup_signal_handler(cancel: &CancellationToken) -> JoinHandle<()> {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = cancel.cancelled() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted; stopping load test.");
                    cancel.cancel();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    warn!("Terminated; stopping load test.");
                    cancel.cancel();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = cancel.cancelled() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted; stopping load test.");
                    cancel.cancel();
                }
            }
        }
    })
}
