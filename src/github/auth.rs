use std::process::Command;
use tracing::debug;

/// Resolve a GitHub token using multiple strategies:
/// 1. `gh auth token` subprocess
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
///
/// Unlike most API surfaces, search works without a token — the quota is
/// just much lower — so resolution failure is not an error here.
pub fn resolve_token() -> Option<String> {
    debug!("Attempting to resolve token via `gh auth token`");
    if let Ok(output) = Command::new("gh").args(["auth", "token"]).output()
        && output.status.success()
    {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!("Token resolved via gh CLI");
            return Some(token);
        }
    }

    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        debug!("Token resolved via GITHUB_TOKEN env var");
        return Some(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN")
        && !token.is_empty()
    {
        debug!("Token resolved via GH_TOKEN env var");
        return Some(token);
    }

    None
}
