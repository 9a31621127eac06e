use super::assembler::{AuthorSection, ReportSummary};

/// Self-contained single-page HTML rendering of a full run, with embedded
/// styles. Every interpolated value goes through `escape`.
pub fn render(summary: &ReportSummary) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("<title>Team Delivery Report</title>\n");
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

    html.push_str("<div class=\"header\">\n<h1>Team Delivery Report</h1>\n");
    html.push_str("<div class=\"header-info\">\n");
    push_info_item(&mut html, "Repository", &summary.repository);
    push_info_item(&mut html, "Period", &summary.period);
    push_info_item(&mut html, "Base branch", &summary.base_branch);
    html.push_str("</div>\n</div>\n");

    for author in &summary.authors {
        push_author_section(&mut html, author);
    }

    html.push_str("<div class=\"stats\">\n");
    push_stat(&mut html, summary.total_authors, "Authors");
    push_stat(&mut html, summary.total_prs, "Total PRs");
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"footer\">Generated {}</div>\n",
        escape(&summary.generated_at.format("%Y-%m-%d %H:%M UTC").to_string())
    ));
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

fn push_author_section(html: &mut String, author: &AuthorSection) {
    html.push_str("<div class=\"author-section\">\n");
    html.push_str(&format!(
        "<div class=\"author-header\"><div class=\"author-name\">{}</div>\
         <div class=\"pr-count\">{} PRs</div></div>\n",
        escape(&author.login),
        author.records.len()
    ));

    if !author.complete {
        html.push_str(&format!(
            "<div class=\"incomplete\">The search reported {} results in total but {} could \
             be retrieved; this list is incomplete. \
             <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">See all results on \
             GitHub</a>.</div>\n",
            author.total_count,
            author.records.len(),
            escape(&author.search_url)
        ));
    }

    if author.records.is_empty() {
        html.push_str("<div class=\"no-prs\">No PRs found in this period.</div>\n");
    } else {
        html.push_str("<div class=\"prs-grid\">\n");
        for pr in &author.records {
            html.push_str(&format!(
                "<a href=\"{url}\" class=\"pr-card\" target=\"_blank\" rel=\"noopener noreferrer\">\
                 <div class=\"pr-title\">{title}</div>\
                 <div class=\"pr-meta\"><span class=\"pr-number\">#{number}</span>\
                 <span class=\"pr-date\">merged: {date}</span></div>\
                 <div class=\"pr-description\">{excerpt}</div></a>\n",
                url = escape(&pr.url),
                title = escape(&pr.title),
                number = pr.number,
                date = escape(&pr.merged_day()),
                excerpt = escape(&pr.body_excerpt),
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
}

fn push_info_item(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        "<div class=\"info-item\"><strong>{}</strong><span>{}</span></div>\n",
        escape(label),
        escape(value)
    ));
}

fn push_stat(html: &mut String, number: usize, label: &str) {
    html.push_str(&format!(
        "<div class=\"stat-item\"><div class=\"stat-number\">{}</div>\
         <div class=\"stat-label\">{}</div></div>\n",
        number,
        escape(label)
    ));
}

/// Minimal HTML escaping for interpolated text.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: #333;
    line-height: 1.6;
    padding: 20px;
}
.container {
    max-width: 1100px;
    margin: 0 auto;
    background: white;
    border-radius: 16px;
    box-shadow: 0 16px 48px rgba(0, 0, 0, 0.3);
    overflow: hidden;
}
.header {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 36px;
    text-align: center;
}
.header h1 { font-size: 2.2em; margin-bottom: 16px; }
.header-info {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 16px;
    text-align: left;
}
.info-item {
    background: rgba(255, 255, 255, 0.12);
    padding: 12px;
    border-radius: 8px;
}
.info-item strong { display: block; font-size: 0.85em; opacity: 0.9; }
.author-section { padding: 32px; border-bottom: 2px solid #e9ecef; }
.author-section:last-of-type { border-bottom: none; }
.author-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 20px;
    padding-bottom: 12px;
    border-bottom: 3px solid #667eea;
}
.author-name { font-size: 1.6em; color: #667eea; font-weight: bold; }
.pr-count {
    background: #667eea;
    color: white;
    padding: 6px 16px;
    border-radius: 16px;
    font-weight: bold;
}
.incomplete {
    background: #fff3cd;
    border: 1px solid #ffe69c;
    border-radius: 8px;
    padding: 12px 16px;
    margin-bottom: 20px;
    color: #664d03;
}
.incomplete a { color: #664d03; }
.prs-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
    gap: 16px;
}
.pr-card {
    border: 2px solid #e9ecef;
    border-radius: 12px;
    padding: 18px;
    text-decoration: none;
    color: inherit;
    display: block;
    transition: all 0.2s ease;
}
.pr-card:hover {
    border-color: #667eea;
    box-shadow: 0 8px 24px rgba(102, 126, 234, 0.25);
}
.pr-title { font-weight: 600; color: #2d3748; margin-bottom: 10px; }
.pr-meta { display: flex; gap: 10px; flex-wrap: wrap; font-size: 0.85em; }
.pr-number { color: #667eea; font-weight: 500; }
.pr-date {
    background: #667eea;
    color: white;
    padding: 2px 10px;
    border-radius: 12px;
}
.pr-description { color: #666; font-size: 0.88em; margin-top: 8px; }
.no-prs { text-align: center; padding: 32px; color: #999; font-size: 1.1em; }
.stats {
    display: flex;
    justify-content: space-around;
    padding: 24px;
    background: #f8f9fa;
    border-top: 3px solid #667eea;
}
.stat-item { text-align: center; }
.stat-number { font-size: 2.2em; font-weight: bold; color: #667eea; }
.stat-label { color: #666; }
.footer {
    text-align: center;
    padding: 12px;
    color: #999;
    font-size: 0.85em;
    background: #f8f9fa;
}
"#;
