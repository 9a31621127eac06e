use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::error::ApiError;
use super::models::{self, PageResult, PullRequest, Query, RateLimit};

/// Per-call network timeout. A timed-out request is a transient error and
/// follows the ordinary retry policy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam between the pagination engine and the HTTP layer, so the pagination
/// and aggregation policies can be exercised against scripted backends.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    /// Fetch exactly one page of search results for one query.
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
    ) -> Result<(PageResult, RateLimit), ApiError>;
}

/// Issues single-page searches against the GitHub search endpoint. Does not
/// retry internally; the caller owns the retry policy.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    per_page: u32,
}

impl SearchClient {
    pub fn new(token: Option<&str>, api_url: &str, per_page: u32) -> Result<Self> {
        if !api_url.starts_with("https://") {
            bail!("GitHub API URL must use HTTPS: {}", api_url);
        }

        let client = Client::builder()
            .user_agent("ghreport")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            per_page,
        })
    }
}

impl SearchBackend for SearchClient {
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
    ) -> Result<(PageResult, RateLimit), ApiError> {
        let url = format!("{}/search/issues", self.api_url);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .query(&[
                ("q", query.search_expression()),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
                ("sort", "merged".to_string()),
                ("order", "desc".to_string()),
            ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Transient(format!("request timed out: {e}"))
            } else {
                ApiError::Transient(format!("request failed: {e}"))
            }
        })?;

        let status = resp.status();
        let rate = rate_limit_from_headers(resp.headers());

        if !status.is_success() {
            return Err(classify_status(status, &rate, resp.headers(), query));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transient(format!("failed to read response body: {e}")))?;
        let result = parse_page(&body, self.per_page)?;

        debug!(
            author = %query.author,
            page,
            returned = result.returned_count,
            total = result.total_count,
            "Fetched search page"
        );
        Ok((result, rate))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    number: u64,
    #[serde(default)]
    title: String,
    html_url: String,
    body: Option<String>,
    closed_at: Option<DateTime<Utc>>,
    pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Deserialize)]
struct PullRequestRef {
    merged_at: Option<DateTime<Utc>>,
}

/// Decode a search response body into a page of PR records. The merge
/// timestamp falls back to `closed_at` when the search item does not carry
/// `pull_request.merged_at`.
pub fn parse_page(body: &str, per_page: u32) -> Result<PageResult, ApiError> {
    let resp: SearchResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;

    let returned_count = resp.items.len();
    let items = resp
        .items
        .into_iter()
        .map(|item| {
            let merged_at = item
                .pull_request
                .and_then(|p| p.merged_at)
                .or(item.closed_at);
            let body_excerpt = models::body_excerpt(&item.title, item.body.as_deref());
            PullRequest {
                number: item.number,
                title: item.title,
                url: item.html_url,
                merged_at,
                body_excerpt,
            }
        })
        .collect();

    Ok(PageResult {
        items,
        total_count: resp.total_count,
        returned_count,
        has_more: returned_count > 0 && returned_count as u32 == per_page,
        incomplete_results: resp.incomplete_results,
    })
}

/// Rate-limit quota as reported in the response headers.
pub fn rate_limit_from_headers(headers: &HeaderMap) -> RateLimit {
    let parse_u32 = |name: &str| -> Option<u32> { headers.get(name)?.to_str().ok()?.parse().ok() };
    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    RateLimit {
        remaining: parse_u32("x-ratelimit-remaining"),
        limit: parse_u32("x-ratelimit-limit"),
        reset_at,
    }
}

fn classify_status(
    status: StatusCode,
    rate: &RateLimit,
    headers: &HeaderMap,
    query: &Query,
) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Authentication("invalid or expired token (HTTP 401)".to_string());
    }
    if status == StatusCode::NOT_FOUND {
        return ApiError::RepositoryNotFound(query.repository.clone());
    }
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if rate.remaining == Some(0) {
            return ApiError::RateLimited {
                reset_at: rate.reset_at,
            };
        }
        if let Some(delay) = retry_after_secs(headers) {
            // Secondary rate limit: the reset comes as a relative delay.
            return ApiError::RateLimited {
                reset_at: Some(Utc::now() + chrono::Duration::seconds(delay)),
            };
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return ApiError::RateLimited { reset_at: None };
        }
        return ApiError::Authentication(
            "access forbidden (HTTP 403); the token may lack repository access".to_string(),
        );
    }
    if status.is_server_error() {
        return ApiError::Transient(format!("HTTP {status}"));
    }
    ApiError::Malformed(format!("unexpected HTTP status {status}"))
}

fn retry_after_secs(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
