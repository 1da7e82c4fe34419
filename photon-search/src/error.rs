//! Error types for the photon-search crate.
//!
//! Each variant maps to a distinct failure class so that the HTTP layer can
//! tell a bad request apart from an unreachable engine or a malformed hit.

/// Errors that can occur while building, running or normalising a geocoding search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The inbound request is unusable (e.g. missing search term).
    #[error("invalid request: {0}")]
    Validation(String),

    /// The search engine did not answer within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// An HTTP request to the search engine failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The search engine response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A hit returned by the engine has a field in an unexpected shape.
    #[error("malformed hit: {0}")]
    DataShape(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Classify a [`reqwest::Error`] raised while talking to `engine`.
    pub(crate) fn from_reqwest(engine: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{engine} did not respond in time: {err}"))
        } else if err.is_decode() {
            Self::Parse(format!("{engine} response could not be decoded: {err}"))
        } else {
            Self::Http(format!("{engine} request failed: {err}"))
        }
    }
}

/// Convenience type alias for photon-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
