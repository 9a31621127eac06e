use chrono::NaiveDate;

use ghreport::github::models::{AggregateReport, AuthorReport, PullRequest, Query};
use ghreport::report::{assembler, html, text};

fn make_query(author: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Query {
    Query {
        author: author.into(),
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        base_branch: "main".into(),
        repository: "acme/widget".into(),
    }
}

fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.into(),
        url: format!("https://github.com/acme/widget/pull/{number}"),
        merged_at: "2025-02-01T12:00:00Z".parse().ok(),
        body_excerpt: "Short description.".into(),
    }
}

fn make_report() -> AggregateReport {
    let alice = make_query("alice", (2025, 1, 1), (2025, 3, 31));
    let bob = make_query("bob", (2025, 2, 1), (2025, 4, 30));

    AggregateReport {
        repository: "acme/widget".into(),
        base_branch: "main".into(),
        generated_at: "2025-08-01T10:00:00Z".parse().unwrap(),
        authors: vec![
            AuthorReport {
                search_url: alice.search_url(),
                query: alice,
                records: vec![make_pr(101, "Add login flow"), make_pr(99, "Fix typo")],
                total_count: 2,
                complete: true,
            },
            AuthorReport {
                search_url: bob.search_url(),
                query: bob,
                records: vec![make_pr(95, "Refactor parser")],
                total_count: 40,
                complete: false,
            },
        ],
    }
}

// --- Assembler ---

#[test]
fn test_assemble_totals() {
    let summary = assembler::assemble(&make_report());
    assert_eq!(summary.total_authors, 2);
    assert_eq!(summary.total_prs, 3);
    assert_eq!(summary.incomplete_authors, 1);
}

#[test]
fn test_assemble_preserves_author_order() {
    let summary = assembler::assemble(&make_report());
    assert_eq!(summary.authors[0].login, "alice");
    assert_eq!(summary.authors[1].login, "bob");
}

#[test]
fn test_assemble_overall_period_spans_windows() {
    let summary = assembler::assemble(&make_report());
    assert_eq!(summary.period, "2025-01-01 to 2025-04-30");
}

#[test]
fn test_assemble_per_author_period() {
    let summary = assembler::assemble(&make_report());
    assert_eq!(summary.authors[0].period, "2025-01-01 to 2025-03-31");
    assert_eq!(summary.authors[1].period, "2025-02-01 to 2025-04-30");
}

#[test]
fn test_assemble_empty_report() {
    let report = AggregateReport {
        repository: "acme/widget".into(),
        base_branch: "main".into(),
        generated_at: "2025-08-01T10:00:00Z".parse().unwrap(),
        authors: vec![],
    };
    let summary = assembler::assemble(&report);
    assert_eq!(summary.total_prs, 0);
    assert_eq!(summary.total_authors, 0);
    assert_eq!(summary.period, "");
}

// --- Text renderer ---

#[test]
fn test_text_report_header() {
    let rendered = text::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("TEAM DELIVERY REPORT"));
    assert!(rendered.contains("Repository: acme/widget"));
    assert!(rendered.contains("Period: 2025-01-01 to 2025-04-30"));
    assert!(rendered.contains("Base branch: main"));
}

#[test]
fn test_text_report_lists_prs() {
    let rendered = text::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("alice (2025-01-01 to 2025-03-31)"));
    assert!(rendered.contains("PRs (2 found):"));
    assert!(rendered.contains("Add login flow"));
    assert!(rendered.contains("https://github.com/acme/widget/pull/101"));
    assert!(rendered.contains("merged: 2025-02-01"));
}

#[test]
fn test_text_report_incomplete_note() {
    let rendered = text::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("40 results in total but 1 could be retrieved"));
    assert!(rendered.contains("https://github.com/search?q="));
}

#[test]
fn test_text_report_totals_footer() {
    let rendered = text::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("Total: 3 PRs from 2 author(s) (1 with incomplete results)"));
}

#[test]
fn test_text_report_empty_author() {
    let mut report = make_report();
    report.authors[0].records.clear();
    report.authors[0].total_count = 0;
    let rendered = text::render(&assembler::assemble(&report));
    assert!(rendered.contains("No PRs found in this period."));
}

// --- HTML renderer ---

#[test]
fn test_html_report_structure() {
    let rendered = html::render(&assembler::assemble(&make_report()));
    assert!(rendered.starts_with("<!DOCTYPE html>"));
    assert!(rendered.contains("Team Delivery Report"));
    assert!(rendered.contains("acme/widget"));
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("bob"));
    assert!(rendered.contains("</html>"));
}

#[test]
fn test_html_report_escapes_interpolations() {
    let mut report = make_report();
    report.authors[0].records[0].title = "Fix <script> & \"quotes\"".into();
    let rendered = html::render(&assembler::assemble(&report));
    assert!(rendered.contains("Fix &lt;script&gt; &amp; &quot;quotes&quot;"));
    assert!(!rendered.contains("<script>"));
}

#[test]
fn test_html_report_incomplete_banner() {
    let rendered = html::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("this list is incomplete"));
    assert!(rendered.contains("See all results on"));
}

#[test]
fn test_html_report_empty_author() {
    let mut report = make_report();
    report.authors[0].records.clear();
    let rendered = html::render(&assembler::assemble(&report));
    assert!(rendered.contains("No PRs found in this period."));
}

#[test]
fn test_html_report_stats() {
    let rendered = html::render(&assembler::assemble(&make_report()));
    assert!(rendered.contains("Total PRs"));
    assert!(rendered.contains("Authors"));
}
