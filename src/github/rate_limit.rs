use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::models::RateLimit;

/// Extra wait applied on top of a reported reset time, to absorb clock skew
/// between this machine and the API.
const RESET_SLACK: Duration = Duration::from_secs(1);

/// Gates outbound search requests: spaces consecutive calls by a minimum
/// interval and blocks while the reported quota is exhausted. Never errors —
/// missing or unusable rate-limit metadata degrades to a fixed delay.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    fallback_delay: Duration,
    last_request: Option<Instant>,
    remaining: Option<u32>,
    reset_at: Option<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            fallback_delay: Duration::from_secs(60),
            last_request: None,
            remaining: None,
            reset_at: None,
        }
    }

    /// Override the wait used when a rate-limit response carries no usable
    /// reset time.
    pub fn with_fallback(mut self, fallback_delay: Duration) -> Self {
        self.fallback_delay = fallback_delay;
        self
    }

    /// Blocks (sleeping, not spinning) until the next request may be issued.
    pub async fn before_request(&mut self) {
        if self.remaining == Some(0) {
            let reset_at = self.reset_at.take();
            self.remaining = None;
            self.wait_for_reset(reset_at).await;
        }

        if let Some(last) = self.last_request {
            let since = last.elapsed();
            if since < self.min_interval {
                tokio::time::sleep(self.min_interval - since).await;
            }
        }

        self.last_request = Some(Instant::now());
    }

    /// Updates quota state from a response's rate-limit headers. Reported
    /// values are authoritative over whatever was recorded before.
    pub fn record_response(&mut self, info: &RateLimit) {
        if let Some(remaining) = info.remaining {
            self.remaining = Some(remaining);
            self.reset_at = info.reset_at;
            debug!(remaining, reset_at = ?info.reset_at, "Rate limit updated");
        }
    }

    /// Sleeps until the given reset time. Falls back to a fixed delay when
    /// the reset time is absent or already past.
    pub async fn wait_for_reset(&mut self, reset_at: Option<DateTime<Utc>>) {
        let wait = match reset_at {
            Some(reset) => match (reset - Utc::now()).to_std() {
                Ok(d) => d + RESET_SLACK,
                Err(_) => self.fallback_delay,
            },
            None => self.fallback_delay,
        };
        if wait.is_zero() {
            return;
        }
        warn!(
            wait_secs = wait.as_secs(),
            "Rate limit exhausted, waiting for reset"
        );
        tokio::time::sleep(wait).await;
    }
}
