use chrono::{DateTime, Utc};
use thiserror::Error;

/// Classification of a failed search API call. The variant decides the retry
/// policy: fatal errors abort the whole run, `RateLimited` waits for the
/// quota reset, `Transient` gets bounded backoff-and-retry, and `Malformed`
/// gives up on the page without being fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("repository not found or not accessible: {0}")]
    RepositoryNotFound(String),

    #[error("rate limit exceeded")]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("transient server error: {0}")]
    Transient(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Fatal errors affect every author identically, so the run aborts
    /// instead of continuing with the remaining queries.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ApiError::Authentication(_) | ApiError::RepositoryNotFound(_)
        )
    }
}
