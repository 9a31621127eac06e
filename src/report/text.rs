use super::assembler::ReportSummary;

const RULE: &str =
    "================================================================================";
const DASH: &str =
    "--------------------------------------------------------------------------------";

/// Plain-text rendering of a full run: banner header, one section per author
/// in configured order, totals footer.
pub fn render(summary: &ReportSummary) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str("TEAM DELIVERY REPORT\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("Repository: {}\n", summary.repository));
    out.push_str(&format!("Period: {}\n", summary.period));
    out.push_str(&format!("Base branch: {}\n", summary.base_branch));
    out.push_str(&format!(
        "Generated: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    for author in &summary.authors {
        out.push('\n');
        out.push_str(&format!("{} ({})\n", author.login, author.period));
        out.push_str(DASH);
        out.push('\n');

        if !author.complete {
            out.push_str(&format!(
                "Note: the search reported {} results in total but {} could be retrieved; \
                 this list is incomplete. See all results on GitHub: {}\n\n",
                author.total_count,
                author.records.len(),
                author.search_url
            ));
        }

        if author.records.is_empty() {
            out.push_str("No PRs found in this period.\n");
        } else {
            out.push_str(&format!("PRs ({} found):\n", author.records.len()));
            for pr in &author.records {
                out.push_str(&format!(
                    "  \u{2022} {} \u{2014} {} \u{2014} merged: {} \u{2014} {}\n",
                    pr.title,
                    pr.url,
                    pr.merged_day(),
                    pr.body_excerpt
                ));
            }
        }
    }

    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Total: {} PRs from {} author(s)",
        summary.total_prs, summary.total_authors
    ));
    if summary.incomplete_authors > 0 {
        out.push_str(&format!(
            " ({} with incomplete results)",
            summary.incomplete_authors
        ));
    }
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    out
}
