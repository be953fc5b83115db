use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::http::{HttpClient, build_rate_limiter, spawn_workers};
use crate::metrics::ResultSet;

use super::{RunConfig, collect_results, merge_errors};

/// Lifecycle of a [`LoadTester`]: `Idle -> Running -> terminal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Terminal result of a run.
///
/// `Failed` keeps the results gathered before the error, but they are not a
/// trustworthy summary of the run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(ResultSet),
    Cancelled(ResultSet),
    Failed { error: AppError, partial: ResultSet },
}

impl RunOutcome {
    #[must_use]
    pub const fn state(&self) -> RunState {
        match self {
            Self::Completed(_) => RunState::Completed,
            Self::Cancelled(_) => RunState::Cancelled,
            Self::Failed { .. } => RunState::Failed,
        }
    }

    #[must_use]
    pub const fn results(&self) -> &ResultSet {
        match self {
            Self::Completed(results) | Self::Cancelled(results) => results,
            Self::Failed { partial, .. } => partial,
        }
    }

    /// Returns the collected results of a completed or cancelled run.
    ///
    /// # Errors
    ///
    /// Returns the terminal error of a failed run.
    pub fn into_result(self) -> AppResult<ResultSet> {
        match self {
            Self::Completed(results) | Self::Cancelled(results) => Ok(results),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Runs the request pipeline for one [`RunConfig`] and publishes its state.
pub struct LoadTester<C> {
    config: C,
    client: Arc<dyn HttpClient>,
    state_tx: watch::Sender<RunState>,
}

impl<C: RunConfig> LoadTester<C> {
    #[must_use]
    pub fn new(config: C, client: Arc<dyn HttpClient>) -> Self {
        let (state_tx, _) = watch::channel(RunState::Idle);
        Self {
            config,
            client,
            state_tx,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Runs the pipeline to a terminal state.
    ///
    /// `cancel` is the root signal: firing it ends the run as `Cancelled`.
    /// Reaching the configured duration ends it as `Completed`; the first
    /// fatal stage error ends it as `Failed` and stops the remaining stages.
    pub async fn run(&self, cancel: &CancellationToken) -> RunOutcome {
        self.state_tx.send_replace(RunState::Running);
        info!(
            workers = self.config.n_workers(),
            max_qps = self.config.max_qps(),
            duration = ?self.config.app_duration(),
            "Load test started"
        );

        let outcome = self.run_pipeline(cancel).await;

        match &outcome {
            RunOutcome::Completed(results) => {
                info!(results = results.len(), "Load test completed");
            }
            RunOutcome::Cancelled(results) => {
                warn!(results = results.len(), "Load test cancelled");
            }
            RunOutcome::Failed { error, partial } => {
                debug!(partial = partial.len(), "Load test failed: {}", error);
            }
        }
        self.state_tx.send_replace(outcome.state());
        outcome
    }

    async fn run_pipeline(&self, cancel: &CancellationToken) -> RunOutcome {
        let scope = cancel.child_token();
        let deadline = self
            .config
            .app_duration()
            .map(|duration| Deadline::start(duration, &scope));

        let (urls, source_errors) = match self.config.requests_source(&scope) {
            Ok(source) => source,
            Err(error) => {
                scope.cancel();
                return RunOutcome::Failed {
                    error,
                    partial: ResultSet::new(),
                };
            }
        };

        let rate_limiter = build_rate_limiter(self.config.max_qps(), &scope).map(Arc::new);
        let (results, worker_errors) = spawn_workers(
            self.config.n_workers(),
            urls,
            Arc::clone(&self.client),
            rate_limiter,
            &scope,
        );
        let sink = tokio::spawn(collect_results(results, scope.clone()));

        let mut errors = merge_errors(vec![source_errors, worker_errors]);
        let first_error = errors.recv().await;
        drop(errors);
        if first_error.is_some() {
            scope.cancel();
        }

        let collected = match sink.await {
            Ok(collected) => collected,
            Err(err) => {
                scope.cancel();
                return RunOutcome::Failed {
                    error: AppError::from(err),
                    partial: ResultSet::new(),
                };
            }
        };
        let deadline_reached = deadline.as_ref().is_some_and(Deadline::reached);
        // Releases the rate limiter ticker and the deadline timer.
        scope.cancel();

        match first_error {
            Some(error) => RunOutcome::Failed {
                error,
                partial: collected,
            },
            None if deadline_reached => RunOutcome::Completed(collected),
            None if cancel.is_cancelled() => RunOutcome::Cancelled(collected),
            None => RunOutcome::Completed(collected),
        }
    }
}

/// Timer that cancels the run scope once the run duration has elapsed.
struct Deadline {
    reached: Arc<AtomicBool>,
    timer: JoinHandle<()>,
}

impl Deadline {
    fn start(duration: Duration, scope: &CancellationToken) -> Self {
        let reached = Arc::new(AtomicBool::new(false));
        let timer = {
            let reached = Arc::clone(&reached);
            let scope = scope.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = scope.cancelled() => {}
                    () = tokio::time::sleep(duration) => {
                        reached.store(true, Ordering::SeqCst);
                        debug!(?duration, "Run deadline reached");
                        scope.cancel();
                    }
                }
            })
        };
        Self { reached, timer }
    }

    fn reached(&self) -> bool {
        self.reached.load(Ordering::SeqCst)
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
