use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::github::models::Query;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub authors: Vec<AuthorEntry>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// `owner/name`
    #[serde(default)]
    pub repository: String,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// One author plus their date window. Dates are calendar dates, inclusive on
/// both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub login: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Deep pagination is bounded by the backend; pages past this are never
    /// requested.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_text_path")]
    pub text_path: PathBuf,
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,
}

fn default_base_branch() -> String {
    "main".to_string()
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_per_page() -> u32 {
    30
}
fn default_max_pages() -> u32 {
    // The search backend serves at most 1000 results per query.
    33
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_secs() -> u64 {
    1
}
fn default_min_interval_ms() -> u64 {
    500
}
fn default_text_path() -> PathBuf {
    PathBuf::from("report.txt")
}
fn default_html_path() -> PathBuf {
    PathBuf::from("report.html")
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            base_branch: default_base_branch(),
            api_url: default_api_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_path: default_text_path(),
            html_path: default_html_path(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: AppConfig =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            return Ok(config);
        }

        // Search candidate paths in order
        let mut candidates = Vec::new();

        // 1. ~/.config/ghreport/config.toml (standard XDG on all platforms)
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/ghreport/config.toml"));
        }

        // 2. Platform-specific path from `directories` crate
        //    (macOS: ~/Library/Application Support/ghreport/)
        if let Some(proj_dirs) = ProjectDirs::from("", "", "ghreport") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path).with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;
                let config: AppConfig =
                    toml::from_str(&content).with_context(|| "Failed to parse config file")?;
                return Ok(config);
            }
        }

        // Fallback to default
        Ok(AppConfig::default())
    }

    /// One search query per configured author, in file order.
    pub fn queries(&self) -> Vec<Query> {
        self.authors
            .iter()
            .map(|author| Query {
                author: author.login.clone(),
                start_date: author.start_date,
                end_date: author.end_date,
                base_branch: self.github.base_branch.clone(),
                repository: self.github.repository.clone(),
            })
            .collect()
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "ghreport") {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share/ghreport/logs")
    }
}
