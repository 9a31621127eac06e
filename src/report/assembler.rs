use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::github::models::{AggregateReport, PullRequest};

/// Renderer-facing view of a whole run: author sections in configured order
/// plus the computed totals. Pure data, no I/O.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub repository: String,
    pub base_branch: String,
    /// Widest window across all configured authors, e.g.
    /// `2025-01-01 to 2025-03-31`.
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub authors: Vec<AuthorSection>,
    pub total_prs: usize,
    pub total_authors: usize,
    pub incomplete_authors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorSection {
    pub login: String,
    pub period: String,
    pub records: Vec<PullRequest>,
    pub total_count: u64,
    pub complete: bool,
    pub search_url: String,
}

/// Flattens an aggregate into the render-ready summary.
pub fn assemble(report: &AggregateReport) -> ReportSummary {
    let authors: Vec<AuthorSection> = report
        .authors
        .iter()
        .map(|author| AuthorSection {
            login: author.query.author.clone(),
            period: format!("{} to {}", author.query.start_date, author.query.end_date),
            records: author.records.clone(),
            total_count: author.total_count,
            complete: author.complete,
            search_url: author.search_url.clone(),
        })
        .collect();

    let total_prs = authors.iter().map(|a| a.records.len()).sum();
    let incomplete_authors = authors.iter().filter(|a| !a.complete).count();

    ReportSummary {
        repository: report.repository.clone(),
        base_branch: report.base_branch.clone(),
        period: overall_period(report),
        generated_at: report.generated_at,
        total_authors: authors.len(),
        total_prs,
        incomplete_authors,
        authors,
    }
}

fn overall_period(report: &AggregateReport) -> String {
    let start: Option<NaiveDate> = report.authors.iter().map(|a| a.query.start_date).min();
    let end: Option<NaiveDate> = report.authors.iter().map(|a| a.query.end_date).max();
    match (start, end) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => String::new(),
    }
}
