//! Global request pacing
//!
//! The indexer talks to a single documentation site, so there is exactly one
//! pacer per run. It enforces a minimum interval between the end of one
//! network request and the start of the next, whatever URL is requested.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks the last network request and delays the next one when needed
#[derive(Debug, Clone)]
pub struct RequestPacer {
    /// Minimum time between two consecutive requests
    min_interval: Duration,

    /// When the previous request finished
    last_request_time: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer that has not seen any request yet
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_time: None,
        }
    }

    /// Returns the configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Suspends until the minimum interval since the last request has passed
    pub async fn wait_turn(&self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Pacing: waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a request finished at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }
}
