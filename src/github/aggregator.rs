use chrono::Utc;
use tracing::{info, warn};

use super::client::SearchBackend;
use super::error::ApiError;
use super::models::{AggregateReport, AuthorReport, Query};
use super::paginator::{Paginator, RetryPolicy};
use super::rate_limit::RateLimiter;

/// Runs one paginated search per configured author and assembles the
/// per-author reports. Authors are processed sequentially, in input order:
/// the search endpoint's per-minute throttle is shared across the whole run,
/// so concurrent fan-out would only trip secondary limits.
pub struct Aggregator<B: SearchBackend> {
    backend: B,
    limiter: RateLimiter,
    retry: RetryPolicy,
    max_pages: u32,
}

impl<B: SearchBackend> Aggregator<B> {
    pub fn new(backend: B, limiter: RateLimiter, retry: RetryPolicy, max_pages: u32) -> Self {
        Self {
            backend,
            limiter,
            retry,
            max_pages,
        }
    }

    /// Processes the queries in input order. Fatal errors abort the whole
    /// run with no partial report; per-author trouble degrades that author's
    /// entry to incomplete and moves on to the next.
    pub async fn run(
        &mut self,
        repository: &str,
        base_branch: &str,
        queries: &[Query],
    ) -> Result<AggregateReport, ApiError> {
        let mut authors = Vec::with_capacity(queries.len());

        for query in queries {
            info!(
                author = %query.author,
                start = %query.start_date,
                end = %query.end_date,
                "Searching merged PRs"
            );

            let mut paginator = Paginator::new(
                &self.backend,
                &mut self.limiter,
                self.retry,
                self.max_pages,
            );
            let outcome = paginator.collect(query).await?;

            if !outcome.complete {
                warn!(
                    author = %query.author,
                    collected = outcome.records.len(),
                    total = outcome.total_count,
                    "Result set incomplete"
                );
            }

            authors.push(AuthorReport {
                search_url: query.search_url(),
                query: query.clone(),
                records: outcome.records,
                total_count: outcome.total_count,
                complete: outcome.complete,
            });
        }

        Ok(AggregateReport {
            repository: repository.to_string(),
            base_branch: base_branch.to_string(),
            generated_at: Utc::now(),
            authors,
        })
    }
}
