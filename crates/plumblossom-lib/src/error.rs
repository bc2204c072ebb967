use std::time::Duration;

use thiserror::Error;

/// Errors a source can report while fetching or extracting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid language {0:?}, use \"es\" or \"en\"")]
    InvalidLanguage(String),
    #[error("unknown source {0:?}")]
    InvalidSource(String),
    #[error("challenge resolver is not running at {endpoint}")]
    ResolverUnavailable { endpoint: String },
    #[error("timed out after {}s waiting for {url}", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },
    #[error("challenge resolver failed: {0}")]
    Resolver(String),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("request error: {0}")]
    Request(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("content too short ({len} chars, expected at least {min}), page is probably blocked")]
    ContentTooShort { len: usize, min: usize },
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether the challenge resolver itself is missing, as opposed to a slow or failed solve.
    pub fn is_resolver_unavailable(&self) -> bool {
        matches!(self, Self::ResolverUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
