//! Terminal result of one download attempt.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{DownloadError, FailureKind};
use crate::parser::ResolvedUrl;

/// Outcome of a single download, produced exactly once per resolved URL per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// A file already existed at the destination; no request was made.
    Skipped {
        /// The URL that would have been downloaded.
        url: ResolvedUrl,
        /// The existing file.
        path: PathBuf,
    },
    /// The download was abandoned; nothing was left at the destination.
    Failed {
        /// The URL that failed.
        url: ResolvedUrl,
        /// Why it failed.
        kind: FailureKind,
        /// Full error message for logs and reports.
        message: String,
    },
    /// The document was verified and written.
    Succeeded {
        /// The downloaded URL.
        url: ResolvedUrl,
        /// Where the document was written.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
}

impl DownloadOutcome {
    /// Builds a `Failed` outcome from a download error.
    #[must_use]
    pub fn failed(url: ResolvedUrl, error: &DownloadError) -> Self {
        Self::Failed {
            url,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// The URL this outcome belongs to.
    #[must_use]
    pub fn url(&self) -> &ResolvedUrl {
        match self {
            Self::Skipped { url, .. } | Self::Failed { url, .. } | Self::Succeeded { url, .. } => {
                url
            }
        }
    }

    /// Destination path, when one exists on disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Skipped { path, .. } | Self::Succeeded { path, .. } => Some(path),
            Self::Failed { .. } => None,
        }
    }

    /// Returns true for `Succeeded`.
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns true for `Skipped`.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Returns true for `Failed`.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Failure reason, if this outcome is `Failed`.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
