use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Upper bound on stored permits; unclaimed ticks are lost, never banked.
const MAX_STORED_PERMITS: usize = 1;

/// Issues one permit every `1s / max_qps` for the lifetime of a run.
///
/// The controller task stops when the run's token is cancelled or the limiter
/// is dropped; waiting acquirers then observe closure instead of blocking.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    period: Duration,
    controller: JoinHandle<()>,
}

/// Builds the limiter for a run, or `None` when `max_qps` is 0 (unlimited).
#[must_use]
pub fn build_rate_limiter(max_qps: u64, cancel: &CancellationToken) -> Option<RateLimiter> {
    if max_qps == 0 {
        return None;
    }
    Some(RateLimiter::new(max_qps, cancel))
}

impl RateLimiter {
    fn new(max_qps: u64, cancel: &CancellationToken) -> Self {
        let period = tick_period(max_qps);
        let permits = Arc::new(Semaphore::new(0));
        let controller =
            spawn_fixed_rate_controller(Arc::clone(&permits), period, cancel.clone());
        Self {
            permits,
            period,
            controller,
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Waits for a permit. Returns `false` when cancellation wins the race or
    /// the limiter has shut down.
    pub async fn acquire(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            permit = self.permits.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    true
                }
                Err(_) => false,
            },
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.controller.abort();
        self.permits.close();
    }
}

fn tick_period(max_qps: u64) -> Duration {
    let rate = u32::try_from(max_qps).unwrap_or(u32::MAX);
    (Duration::from_secs(1) / rate).max(Duration::from_nanos(1))
}

fn spawn_fixed_rate_controller(
    permits: Arc<Semaphore>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rate_tick = interval(period);
        rate_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = rate_tick.tick() => {
                    let available = permits.available_permits();
                    if available < MAX_STORED_PERMITS {
                        permits.add_permits(MAX_STORED_PERMITS.saturating_sub(available));
                    }
                }
            }
        }
        permits.close();
    })
}
