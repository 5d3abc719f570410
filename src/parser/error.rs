//! Error types for link resolution.

use thiserror::Error;

/// Maximum URL length to accept (standard browser limit).
/// URLs longer than this are rejected to prevent memory issues.
pub const MAX_URL_LENGTH: usize = 2000;

/// Reasons a resolved link is dropped before any download is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The resolved string does not parse as a URL.
    #[error("invalid URL '{url}': {reason}")]
    Malformed {
        /// The URL that failed to parse
        url: String,
        /// Parser message
        reason: String,
    },

    /// Only http and https can be fetched.
    #[error("invalid URL '{url}': scheme '{scheme}' is not supported")]
    UnsupportedScheme {
        /// The offending URL
        url: String,
        /// The scheme that was found
        scheme: String,
    },

    /// The URL still has no host after resolution.
    #[error("invalid URL '{url}': URL has no host")]
    NoHost {
        /// The offending URL
        url: String,
    },

    /// URL exceeds maximum allowed length
    #[error("URL too long ({length} chars, max {max}): {url_preview}...")]
    TooLong {
        /// Truncated URL for display
        url_preview: String,
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl ResolveError {
    /// Creates a `Malformed` error from a parser message.
    #[must_use]
    pub fn malformed(url: &str, reason: &str) -> Self {
        Self::Malformed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `UnsupportedScheme` error.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::UnsupportedScheme {
            url: url.to_string(),
            scheme: scheme.to_string(),
        }
    }

    /// Creates a `NoHost` error.
    #[must_use]
    pub fn no_host(url: &str) -> Self {
        Self::NoHost {
            url: url.to_string(),
        }
    }

    /// Creates a `TooLong` error for URLs exceeding the maximum length.
    #[must_use]
    pub fn too_long(url: &str) -> Self {
        Self::TooLong {
            url_preview: url.chars().take(50).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }
}
