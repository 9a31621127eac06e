use anyhow::Result;
use tracing::debug;

/// Open a URL or local file in the user's default browser.
pub fn open_url(url: &str) -> Result<()> {
    debug!(url = url, "Opening in browser");
    open::that(url)?;
    Ok(())
}
