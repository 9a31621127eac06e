use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use super::client::SearchBackend;
use super::error::ApiError;
use super::models::{PageResult, PullRequest, Query};
use super::rate_limit::RateLimiter;

/// Retry policy for transient per-page failures. Values are tunable
/// configuration, not invariants.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff: base, 2x base, 4x base, ...
    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }
}

/// Everything gathered for one query once pagination stops.
#[derive(Debug, Clone)]
pub struct Paginated {
    pub records: Vec<PullRequest>,
    pub total_count: u64,
    pub complete: bool,
}

/// Drives a `SearchBackend` across all pages of a single query, gated by the
/// rate limiter between requests.
pub struct Paginator<'a, B: SearchBackend> {
    backend: &'a B,
    limiter: &'a mut RateLimiter,
    retry: RetryPolicy,
    max_pages: u32,
}

impl<'a, B: SearchBackend> Paginator<'a, B> {
    pub fn new(
        backend: &'a B,
        limiter: &'a mut RateLimiter,
        retry: RetryPolicy,
        max_pages: u32,
    ) -> Self {
        Self {
            backend,
            limiter,
            retry,
            max_pages,
        }
    }

    /// Collects every reachable page for the query. Only fatal errors
    /// propagate; anything recoverable degrades to `complete = false` while
    /// keeping the pages already gathered.
    pub async fn collect(&mut self, query: &Query) -> Result<Paginated, ApiError> {
        let mut records: Vec<PullRequest> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();
        let mut total_count: u64 = 0;
        let mut complete = true;
        let mut page: u32 = 1;

        loop {
            let fetched = match self.fetch_with_retry(query, page).await? {
                Some(result) => result,
                None => {
                    // Retries exhausted or page undecodable: keep what we have.
                    complete = false;
                    break;
                }
            };

            if page == 1 {
                total_count = fetched.total_count;
            }
            if fetched.incomplete_results {
                // The backend truncated the match set on its side.
                complete = false;
            }

            // Result windows can shift between pages; drop duplicate numbers.
            for pr in fetched.items {
                if seen.insert(pr.number) {
                    records.push(pr);
                }
            }

            if !fetched.has_more || records.len() as u64 >= total_count {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    author = %query.author,
                    page,
                    "Page ceiling reached, result set truncated"
                );
                complete = false;
                break;
            }
            page += 1;
        }

        if (records.len() as u64) < total_count {
            complete = false;
        }

        debug!(
            author = %query.author,
            collected = records.len(),
            total = total_count,
            complete,
            "Pagination finished"
        );
        Ok(Paginated {
            records,
            total_count,
            complete,
        })
    }

    /// One page under the bounded retry loop. `Ok(None)` means the page (and
    /// with it the rest of this query) was given up on without being fatal.
    async fn fetch_with_retry(
        &mut self,
        query: &Query,
        page: u32,
    ) -> Result<Option<PageResult>, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            self.limiter.before_request().await;
            match self.backend.fetch_page(query, page).await {
                Ok((result, rate)) => {
                    self.limiter.record_response(&rate);
                    return Ok(Some(result));
                }
                // Waiting out the quota does not consume a retry attempt.
                Err(ApiError::RateLimited { reset_at }) => {
                    self.limiter.wait_for_reset(reset_at).await;
                }
                Err(ApiError::Transient(reason)) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        warn!(author = %query.author, page, reason = %reason, "Retries exhausted for page");
                        return Ok(None);
                    }
                    let delay = self.retry.backoff(attempt - 1);
                    debug!(
                        author = %query.author,
                        page,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "Transient error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(ApiError::Malformed(reason)) => {
                    warn!(
                        author = %query.author,
                        page,
                        reason = %reason,
                        "Undecodable page, giving up on remainder"
                    );
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
