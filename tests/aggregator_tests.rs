use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;

use ghreport::github::aggregator::Aggregator;
use ghreport::github::client::SearchBackend;
use ghreport::github::error::ApiError;
use ghreport::github::models::{PageResult, PullRequest, Query, RateLimit};
use ghreport::github::paginator::RetryPolicy;
use ghreport::github::rate_limit::RateLimiter;

struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<PageResult, ApiError>>>,
}

impl ScriptedBackend {
    fn new(responses: Vec<Result<PageResult, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl SearchBackend for ScriptedBackend {
    async fn fetch_page(
        &self,
        _query: &Query,
        _page: u32,
    ) -> Result<(PageResult, RateLimit), ApiError> {
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(result)) => Ok((result, RateLimit::default())),
            Some(Err(err)) => Err(err),
            None => panic!("backend called more times than scripted"),
        }
    }
}

fn make_query(author: &str) -> Query {
    Query {
        author: author.into(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        base_branch: "main".into(),
        repository: "acme/widget".into(),
    }
}

fn make_pr(number: u64) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        url: format!("https://github.com/acme/widget/pull/{number}"),
        merged_at: "2025-02-01T12:00:00Z".parse().ok(),
        body_excerpt: format!("PR {number}"),
    }
}

fn page_of(count: u64) -> PageResult {
    let items: Vec<PullRequest> = (1..=count).map(make_pr).collect();
    let returned_count = items.len();
    PageResult {
        items,
        total_count: count,
        returned_count,
        has_more: false,
        incomplete_results: false,
    }
}

fn make_aggregator(backend: ScriptedBackend) -> Aggregator<ScriptedBackend> {
    let limiter = RateLimiter::new(Duration::ZERO).with_fallback(Duration::ZERO);
    let retry = RetryPolicy {
        max_attempts: 3,
        backoff_base: Duration::ZERO,
    };
    Aggregator::new(backend, limiter, retry, 33)
}

#[tokio::test]
async fn test_author_order_preserved() {
    let backend = ScriptedBackend::new(vec![
        Ok(page_of(3)),
        Ok(page_of(0)),
        Ok(page_of(7)),
    ]);
    let queries = vec![
        make_query("alice"),
        make_query("bob"),
        make_query("carol"),
    ];

    let mut aggregator = make_aggregator(backend);
    let report = aggregator
        .run("acme/widget", "main", &queries)
        .await
        .unwrap();

    assert_eq!(report.repository, "acme/widget");
    assert_eq!(report.base_branch, "main");
    assert_eq!(report.authors.len(), 3);
    assert_eq!(report.authors[0].query.author, "alice");
    assert_eq!(report.authors[1].query.author, "bob");
    assert_eq!(report.authors[2].query.author, "carol");
    assert_eq!(report.authors[0].records.len(), 3);
    assert!(report.authors[1].records.is_empty());
    assert_eq!(report.authors[2].records.len(), 7);
}

#[tokio::test]
async fn test_empty_result_author_still_reported() {
    let backend = ScriptedBackend::new(vec![Ok(page_of(0))]);
    let queries = vec![make_query("alice")];

    let mut aggregator = make_aggregator(backend);
    let report = aggregator
        .run("acme/widget", "main", &queries)
        .await
        .unwrap();

    assert_eq!(report.authors.len(), 1);
    assert!(report.authors[0].complete);
    assert_eq!(report.authors[0].total_count, 0);
}

#[tokio::test]
async fn test_fatal_error_aborts_entire_run() {
    // Second author's first page returns 401: no report for either author.
    let backend = ScriptedBackend::new(vec![
        Ok(page_of(5)),
        Err(ApiError::Authentication("token revoked".into())),
    ]);
    let queries = vec![make_query("alice"), make_query("bob")];

    let mut aggregator = make_aggregator(backend);
    let result = aggregator.run("acme/widget", "main", &queries).await;
    assert!(matches!(result, Err(ApiError::Authentication(_))));
}

#[tokio::test]
async fn test_repository_not_found_aborts() {
    let backend = ScriptedBackend::new(vec![Err(ApiError::RepositoryNotFound(
        "acme/widget".into(),
    ))]);
    let queries = vec![make_query("alice"), make_query("bob")];

    let mut aggregator = make_aggregator(backend);
    let result = aggregator.run("acme/widget", "main", &queries).await;
    assert!(matches!(result, Err(ApiError::RepositoryNotFound(_))));
}

#[tokio::test]
async fn test_nonfatal_failure_isolated_per_author() {
    // Alice's only page exhausts its retries; Bob is unaffected.
    let backend = ScriptedBackend::new(vec![
        Err(ApiError::Transient("HTTP 500".into())),
        Err(ApiError::Transient("HTTP 500".into())),
        Err(ApiError::Transient("HTTP 500".into())),
        Ok(page_of(4)),
    ]);
    let queries = vec![make_query("alice"), make_query("bob")];

    let mut aggregator = make_aggregator(backend);
    let report = aggregator
        .run("acme/widget", "main", &queries)
        .await
        .unwrap();

    assert_eq!(report.authors.len(), 2);
    assert!(!report.authors[0].complete);
    assert!(report.authors[0].records.is_empty());
    assert!(report.authors[1].complete);
    assert_eq!(report.authors[1].records.len(), 4);
}

#[tokio::test]
async fn test_search_url_populated_for_each_author() {
    let backend = ScriptedBackend::new(vec![Ok(page_of(1)), Ok(page_of(1))]);
    let queries = vec![make_query("alice"), make_query("bob")];

    let mut aggregator = make_aggregator(backend);
    let report = aggregator
        .run("acme/widget", "main", &queries)
        .await
        .unwrap();

    assert!(report.authors[0].search_url.contains("author:alice"));
    assert!(report.authors[1].search_url.contains("author:bob"));
}

#[tokio::test]
async fn test_no_queries_yields_empty_report() {
    let backend = ScriptedBackend::new(vec![]);
    let mut aggregator = make_aggregator(backend);
    let report = aggregator.run("acme/widget", "main", &[]).await.unwrap();
    assert!(report.authors.is_empty());
}
