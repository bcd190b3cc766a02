use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

/// Failure of a single fetch attempt (direct, or via one proxy).
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status code {0}")]
    Status(StatusCode),

    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A failed attempt together with the strategy that produced it.
#[derive(Debug)]
pub struct AttemptFailure {
    /// Strategy label: `"direct"` or the proxy base URL.
    pub strategy: String,
    pub error: AttemptError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

fn format_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(AttemptFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Custom error type for smart fetch operations
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    UrlError(String),

    #[error("All fetch attempts failed: {}", format_attempts(.0))]
    Exhausted(Vec<AttemptFailure>),
}

/// Top-level error for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TLS configuration error: {0}")]
    TlsError(String),

    #[error(transparent)]
    FetchError(#[from] FetchError),
}
