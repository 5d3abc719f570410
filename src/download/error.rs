//! Error types for the download module.
//!
//! Every error carries the URL or path it concerns, and maps onto a
//! [`FailureKind`] that names the terminal reason reported for an item.

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while fetching a page or downloading a document.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// body interrupted mid-stream, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a status other than 200.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response does not declare `application/pdf`.
    #[error("invalid content type for {url}: '{content_type}' (expected application/pdf)")]
    InvalidContentType {
        /// The URL that was fetched.
        url: String,
        /// The `Content-Type` header value (empty when absent).
        content_type: String,
    },

    /// The response body contained zero bytes.
    #[error("empty body downloading {url}; no file created")]
    EmptyBody {
        /// The URL that was fetched.
        url: String,
    },

    /// File system error while persisting a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a content-type mismatch error.
    pub fn invalid_content_type(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::InvalidContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an empty-body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Classifies the error into the reason reported for the item.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => FailureKind::Transport,
            Self::HttpStatus { status, .. } => FailureKind::BadStatus(*status),
            Self::InvalidContentType { .. } => FailureKind::InvalidContentType,
            Self::EmptyBody { .. } => FailureKind::EmptyBody,
            Self::Io { .. } => FailureKind::Disk,
            Self::InvalidUrl { .. } => FailureKind::InvalidUrl,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path context the source errors don't carry.

/// Terminal failure reason for a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// DNS, connect, TLS, timeout, or interrupted body.
    Transport,
    /// HTTP status other than 200.
    BadStatus(u16),
    /// Response was not declared as `application/pdf`.
    InvalidContentType,
    /// Response body had zero bytes.
    EmptyBody,
    /// Creating or writing the destination failed.
    Disk,
    /// URL could not be requested at all.
    InvalidUrl,
    /// The worker running the download stopped before reporting.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport error"),
            Self::BadStatus(status) => write!(f, "bad status: {status}"),
            Self::InvalidContentType => f.write_str("invalid content type"),
            Self::EmptyBody => f.write_str("empty body"),
            Self::Disk => f.write_str("disk error"),
            Self::InvalidUrl => f.write_str("invalid url"),
            Self::Aborted => f.write_str("task aborted"),
        }
    }
}

impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
