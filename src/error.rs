use reqwest::StatusCode;
use thiserror::Error;

/// Why a single page could not be checked for a featured image.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),
}

impl ExtractError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExtractError::Request(e) if e.is_timeout())
    }
}
