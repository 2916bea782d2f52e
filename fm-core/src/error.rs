/// Error types for telemetry fetches
use std::time::Duration;
use thiserror::Error;

/// A fetch that produced no usable response.
///
/// Every variant is a network-level failure as far as the dashboard is
/// concerned: it is reported at the tier that issued the fetch and never
/// escalated past it. Records that merely lack required fields are not
/// errors; the decoders drop them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// The body was not the JSON envelope we expected
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No response within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The configured API address cannot be used as a base URL
    #[error("invalid API address: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Type alias for Results using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;
