//! Menu source errors.

use thiserror::Error;

/// Why a menu fetch failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport could not complete the exchange.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// URL is not absolute http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx status; `message` is a prefix of the body.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Body did not decode into the expected shape.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timed out")]
    Timeout,
}

impl FetchError {
    /// Whether trying again might succeed: timeouts, transport failures and 5xx.
    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::RequestError(_) => true,
            FetchError::HttpError { status, .. } => (500..600).contains(status),
            FetchError::InvalidUrl(_) | FetchError::ParseError(_) => false,
        }
    }
}
