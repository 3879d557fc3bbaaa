//! Dispatch pacing for the scraped host
//!
//! A [`Pacer`] owns the time of the last dispatch. The lock is held across the
//! pacing sleep, so concurrent callers queue behind one clock and every pair of
//! consecutive dispatches is at least `min_spacing` apart.

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Shared pacing clock
#[derive(Debug)]
pub struct Pacer {
    config: PacingConfig,
    last_dispatch: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer that has not dispatched anything yet
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Wait for the next dispatch slot and claim it
    ///
    /// Returns the instant recorded as the dispatch time.
    pub async fn wait(&self) -> Instant {
        let mut last = self.last_dispatch.lock().await;

        let jitter = random_between(self.config.jitter_min, self.config.jitter_max);
        let delay = match *last {
            Some(previous) => {
                let elapsed = previous.elapsed();
                if elapsed < self.config.min_spacing {
                    self.config.min_spacing - elapsed + jitter
                } else {
                    jitter
                }
            }
            None => jitter,
        };

        trace!(delay_ms = delay.as_millis() as u64, "Pacing dispatch");
        tokio::time::sleep(delay).await;

        let now = Instant::now();
        *last = Some(now);
        now
    }
}

/// Uniform random duration in `[min, max)`; `min` when the range is empty
pub(crate) fn random_between(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}
