//! Error types and handling for pinedocs-core operations.
//!
//! This module provides a single error type covering all failure modes of the
//! scraping pipeline. Errors are categorized for the extraction records and
//! the final summary, and carry a recoverability hint that drives retry logic.
//!
//! ## Failure policy
//!
//! - [`Error::ContentNotFound`] means the page's content container could not
//!   be located. The page is skipped and recorded, never fatal.
//! - [`Error::Format`] is partial by design: formatting degrades to a blank
//!   substructure instead of failing the page, so this error only surfaces
//!   when a page cannot be formatted at all.
//! - Fetch-category errors are retried with backoff while
//!   [`Error::is_recoverable`] returns `true`, then the page is marked failed.
//! - Only filesystem write failures abort the whole run.

use thiserror::Error;

/// The main error type for pinedocs-core operations.
///
/// All public functions in pinedocs-core return `Result<T, Error>`. The
/// variants map onto the error taxonomy used in extraction records: fetch
/// failures, structural mismatches, and partial formatting failures.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers output-file writes and reading a previously written URL index.
    /// Write failures on output documents are the only fatal errors in a run.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// The underlying `reqwest::Error` is preserved for detailed connection
    /// information. Connection and timeout errors are recoverable; malformed
    /// URL errors are permanent.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Fetch returned an unsuccessful HTTP status.
    ///
    /// Rate-limit (429) and server (5xx) statuses are treated as transient
    /// and retried with backoff; client errors are permanent.
    #[error("Fetch failed for '{url}' with status {status}")]
    Fetch {
        /// URL that failed to fetch.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// No content container matched the configured region hints.
    ///
    /// Surfaced as a skipped page in the extraction records, never as a
    /// process abort.
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// Markdown formatting failed for an entire page.
    ///
    /// Missing substructures inside a page degrade to blank sections instead
    /// of raising this error.
    #[error("Format error: {0}")]
    Format(String),

    /// HTML or markdown input could not be parsed.
    ///
    /// Covers invalid selectors built from configuration and URL-index files
    /// that do not match the expected markdown shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    ///
    /// Typically recoverable with retry logic.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary: network
    /// timeouts and connection failures, HTTP 429/5xx statuses, and
    /// interrupted I/O. The fetch retry loop keeps retrying with exponential
    /// backoff while this returns `true` and attempts remain.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Fetch { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Timeout(_) => true,
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used for extraction records, the failure summary, and log fields.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::Fetch { .. } => "fetch",
            Self::ContentNotFound(_) => "content_not_found",
            Self::Format(_) => "format",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenient result type for pinedocs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_statuses_are_recoverable_only_when_transient() {
        let rate_limited = Error::Fetch {
            url: "https://example.com/docs".to_string(),
            status: 429,
        };
        let server_error = Error::Fetch {
            url: "https://example.com/docs".to_string(),
            status: 503,
        };
        let not_found = Error::Fetch {
            url: "https://example.com/docs".to_string(),
            status: 404,
        };

        assert!(rate_limited.is_recoverable());
        assert!(server_error.is_recoverable());
        assert!(!not_found.is_recoverable());
    }

    #[test]
    fn structural_errors_are_permanent() {
        assert!(!Error::ContentNotFound("no main container".to_string()).is_recoverable());
        assert!(!Error::Format("missing table body".to_string()).is_recoverable());
        assert!(!Error::Config("bad selector".to_string()).is_recoverable());
    }

    #[test]
    fn timeout_is_recoverable() {
        assert!(Error::Timeout("render timed out".to_string()).is_recoverable());
    }

    #[test]
    fn io_recoverability_follows_error_kind() {
        let interrupted = Error::Io(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "interrupted",
        ));
        let denied = Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        assert!(interrupted.is_recoverable());
        assert!(!denied.is_recoverable());
    }

    #[test]
    fn categories_match_record_taxonomy() {
        assert_eq!(
            Error::ContentNotFound(String::new()).category(),
            "content_not_found"
        );
        assert_eq!(
            Error::Fetch {
                url: String::new(),
                status: 500
            }
            .category(),
            "fetch"
        );
        assert_eq!(Error::Format(String::new()).category(), "format");
    }
}
