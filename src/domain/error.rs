//! Error types for the unimarket engine.
//!
//! This module defines the centralized error type [`MarketError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! # Taxonomy
//!
//! - [`MarketError::Validation`] — client-side rejection of a listing draft.
//!   Never reaches the network; shown inline next to the offending field.
//! - [`MarketError::Network`] — the transport failed (connection refused,
//!   timeout). Prior data is retained; shown as a dismissible banner.
//! - [`MarketError::Server`] — the server answered with a non-2xx status.
//!   Same presentation as a network failure, but carries the status code.
//!
//! Discarding a stale fetch response is deliberately NOT an error: a superseded
//! response is dropped silently at the commit point and never surfaces.

use thiserror::Error;

/// The main error type for unimarket engine operations.
///
/// This enum consolidates all error conditions that can occur while browsing or
/// posting listings, from draft validation to transport failures and configuration
/// issues. All failures are caught at the handler/worker boundary and converted
/// into state; none of them escape as panics.
///
/// # Examples
///
/// ```
/// use unimarket::domain::MarketError;
///
/// fn require_name(name: &str) -> Result<(), MarketError> {
///     if name.trim().is_empty() {
///         return Err(MarketError::Validation("name is required".to_string()));
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Error)]
pub enum MarketError {
    /// A listing draft failed client-side validation.
    ///
    /// Raised before any network call is made: a required field was blank after
    /// trimming, or the price string did not parse to a finite non-negative
    /// number. The string describes the first failing rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// The HTTP transport failed before a response was received.
    ///
    /// Covers connection failures, DNS errors and request timeouts. The string
    /// carries the underlying transport diagnostic.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    ///
    /// `detail` holds the status text plus the parsed error body when the
    /// server provided one.
    #[error("server error ({status}): {detail}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Status text, optionally followed by the server's error payload.
        detail: String,
    },

    /// Configuration is invalid or missing.
    ///
    /// Occurs when the config file cannot be parsed or the API base URL is
    /// malformed. The string describes the specific configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Communication with the background worker failed.
    ///
    /// Occurs when the request or response channel to the fetch worker is
    /// closed unexpectedly.
    #[error("worker communication error: {0}")]
    Worker(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations (config file reads).
    /// Automatically converts from `std::io::Error` using the `#[from]` attribute.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for unimarket operations.
///
/// This is a type alias for `std::result::Result<T, MarketError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_formats_status_and_detail() {
        let err = MarketError::Server {
            status: 503,
            detail: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "server error (503): Service Unavailable");
    }

    #[test]
    fn test_io_error_converts() {
        fn read() -> Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into())
        }
        assert!(matches!(read(), Err(MarketError::Io(_))));
    }
}
