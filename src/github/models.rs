use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longest body excerpt carried on a PR record.
pub const EXCERPT_MAX_CHARS: usize = 150;

/// One configured search: a single author and date window against one
/// repository and base branch. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub author: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub base_branch: String,
    pub repository: String,
}

impl Query {
    /// GitHub search expression for this query. Date bounds are inclusive
    /// on both ends.
    pub fn search_expression(&self) -> String {
        format!(
            "is:pr repo:{} is:merged base:{} merged:{}..{} author:{}",
            self.repository, self.base_branch, self.start_date, self.end_date, self.author
        )
    }

    /// Browser URL showing the same search, for following up on truncated
    /// result sets by hand.
    pub fn search_url(&self) -> String {
        format!(
            "https://github.com/search?q={}",
            self.search_expression().replace(' ', "+")
        )
    }
}

/// A merged pull request as gathered from the search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub body_excerpt: String,
}

impl PullRequest {
    /// Merge date as `YYYY-MM-DD`, or `N/A` when the search item carried no
    /// usable timestamp.
    pub fn merged_day(&self) -> String {
        self.merged_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Short single-line excerpt from a PR body, falling back to the title when
/// the body is empty.
pub fn body_excerpt(title: &str, body: Option<&str>) -> String {
    let cleaned = body
        .unwrap_or("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return title.to_string();
    }
    if cleaned.chars().count() <= EXCERPT_MAX_CHARS {
        return cleaned;
    }
    let cut: String = cleaned.chars().take(EXCERPT_MAX_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// One page of search results, as returned by a single API call.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub items: Vec<PullRequest>,
    pub total_count: u64,
    pub returned_count: usize,
    pub has_more: bool,
    /// Set when the backend itself flagged the match set as truncated,
    /// independent of pagination.
    pub incomplete_results: bool,
}

/// Rate-limit quota reported by the API. All fields optional since the
/// metadata can be absent from a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimit {
    pub remaining: Option<u32>,
    pub limit: Option<u32>,
    pub reset_at: Option<DateTime<Utc>>,
}

/// Everything collected for one author, finalized after pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorReport {
    pub query: Query,
    /// Merge-date order, newest first, as provided by the API.
    pub records: Vec<PullRequest>,
    pub total_count: u64,
    pub complete: bool,
    pub search_url: String,
}

/// The whole run: one entry per configured author, in input order. No author
/// is dropped on partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub repository: String,
    pub base_branch: String,
    pub generated_at: DateTime<Utc>,
    pub authors: Vec<AuthorReport>,
}
