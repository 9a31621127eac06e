use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use ghreport::github::{self, aggregator::Aggregator, paginator::RetryPolicy, rate_limit::RateLimiter};
use ghreport::report;
use ghreport::util::{self, config::AppConfig};

#[derive(Parser, Debug)]
#[command(
    name = "ghreport",
    version,
    about = "Merged-PR report generator for GitHub repositories"
)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub token (overrides gh CLI / GITHUB_TOKEN / GH_TOKEN resolution)
    #[arg(short, long)]
    token: Option<String>,

    /// Where to write the plain-text report
    #[arg(long)]
    text_out: Option<PathBuf>,

    /// Where to write the HTML report
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Open the HTML report in the default browser when done
    #[arg(long)]
    open: bool,

    /// Enable debug logging to file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    let _guard = setup_logging(&config, cli.debug)?;

    info!("ghreport starting");

    if config.github.repository.is_empty() || !config.github.repository.contains('/') {
        eprintln!(
            "No repository configured. Please add one to your config file.\n\
             Example config (~/.config/ghreport/config.toml):\n\n\
             [github]\n\
             repository = \"owner/name\"\n\
             base_branch = \"main\""
        );
        std::process::exit(1);
    }

    if config.authors.is_empty() {
        eprintln!(
            "No authors configured. Please add at least one author entry:\n\n\
             [[authors]]\n\
             login = \"octocat\"\n\
             start_date = \"2025-01-01\"\n\
             end_date = \"2025-03-31\""
        );
        std::process::exit(1);
    }

    let token = cli.token.or_else(github::auth::resolve_token);
    if token.is_none() {
        eprintln!(
            "Warning: no GitHub token found (gh CLI, GITHUB_TOKEN, GH_TOKEN). \
             Proceeding unauthenticated with a much lower rate limit."
        );
    }

    let client = github::SearchClient::new(
        token.as_deref(),
        &config.github.api_url,
        config.search.per_page,
    )?;
    let limiter = RateLimiter::new(Duration::from_millis(config.search.min_interval_ms));
    let retry = RetryPolicy {
        max_attempts: config.search.max_attempts,
        backoff_base: Duration::from_secs(config.search.backoff_secs),
    };

    let queries = config.queries();
    println!(
        "Searching merged PRs for {} author(s) in {} (base: {})...",
        queries.len(),
        config.github.repository,
        config.github.base_branch
    );

    let mut aggregator = Aggregator::new(client, limiter, retry, config.search.max_pages);
    let aggregate = match aggregator
        .run(&config.github.repository, &config.github.base_branch, &queries)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Search aborted: {e}");
            std::process::exit(1);
        }
    };

    let summary = report::assembler::assemble(&aggregate);

    let text_path = cli.text_out.unwrap_or_else(|| config.output.text_path.clone());
    let html_path = cli.html_out.unwrap_or_else(|| config.output.html_path.clone());

    write_report(&text_path, &report::text::render(&summary))?;
    println!("Text report written to {}", text_path.display());

    write_report(&html_path, &report::html::render(&summary))?;
    println!("HTML report written to {}", html_path.display());

    let incomplete_note = if summary.incomplete_authors > 0 {
        format!(", {} with incomplete results", summary.incomplete_authors)
    } else {
        String::new()
    };
    println!(
        "Done: {} PRs from {} author(s){}",
        summary.total_prs, summary.total_authors, incomplete_note
    );

    if cli.open {
        util::browser::open_url(&html_path.display().to_string())?;
    }

    Ok(())
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if !debug {
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "ghreport.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("ghreport=debug")
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
