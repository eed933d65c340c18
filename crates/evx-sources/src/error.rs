//! Source error types.

use thiserror::Error;

/// Errors raised by a literature provider or by the fan-out around it.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a provider response or a local dump.
    #[error("parse error: {0}")]
    Parse(String),

    /// Local dump I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The provider did not answer within the per-source timeout.
    #[error("source '{source_name}' timed out after {secs}s")]
    Timeout {
        /// Name of the provider.
        source_name: String,
        /// Timeout that elapsed.
        secs: u64,
    },

    /// A provider failed; aborts resolution under the fail-fast policy.
    #[error("source '{source_name}' unavailable: {reason}")]
    Unavailable {
        /// Name of the provider.
        source_name: String,
        /// Underlying failure.
        reason: String,
    },
}
