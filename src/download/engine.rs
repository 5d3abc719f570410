//! Verified, idempotent PDF downloads and the bounded worker pool that runs them.
//!
//! [`download_pdf`] is the per-URL state machine:
//!
//! 1. destination exists → `Skipped` (no request)
//! 2. GET with the client's fixed timeout; transport error → `Failed`
//! 3. status ≠ 200 → `Failed`
//! 4. `Content-Type` without `application/pdf` → `Failed`
//! 5. body fully buffered; zero bytes → `Failed`
//! 6. buffer persisted atomically; disk error → `Failed`
//! 7. `Succeeded`
//!
//! Because a file is only created once its content is validated and fully in
//! memory, a failed download never leaves a partial or empty file behind, and
//! the final step never replaces a file that already exists.
//!
//! [`DownloadEngine`] runs [`download_pdf`] for a deduplicated list of URLs
//! using a semaphore-based concurrency limit. URLs that sanitize to the same
//! filename run one after another, in input order.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{DownloadEngine, HttpClient};
//! use harvester_core::parser::resolve_url;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(4)?;
//! let client = HttpClient::new();
//! let urls = vec![resolve_url("https://example.com/sheet.pdf", "https://example.com")?];
//! let report = engine.download_all(&client, urls, Path::new("./PDFs")).await?;
//! println!("Succeeded: {}, Skipped: {}, Failed: {}",
//!     report.stats.succeeded(), report.stats.skipped(), report.stats.failed());
//! # Ok(())
//! # }
//! ```

mod persistence;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use self::persistence::{Persisted, is_regular_file, persist_once};
use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::error::FailureKind;
use super::filename::{FilenameStyle, url_to_filename};
use super::outcome::DownloadOutcome;
use super::HttpClient;
use crate::parser::ResolvedUrl;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Counters for one batch of downloads.
///
/// Uses atomic counters for thread-safe updates from concurrent download tasks.
#[derive(Debug, Default)]
pub struct DownloadStats {
    succeeded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents downloaded and written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    /// Returns the number of URLs whose file already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of URLs processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded() + self.skipped() + self.failed()
    }

    fn record(&self, outcome: &DownloadOutcome) {
        let counter = match outcome {
            DownloadOutcome::Succeeded { .. } => &self.succeeded,
            DownloadOutcome::Skipped { .. } => &self.skipped,
            DownloadOutcome::Failed { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

impl Serialize for DownloadStats {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DownloadStats", 4)?;
        state.serialize_field("succeeded", &self.succeeded())?;
        state.serialize_field("skipped", &self.skipped())?;
        state.serialize_field("failed", &self.failed())?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Result of [`DownloadEngine::download_all`].
#[derive(Debug, Serialize)]
pub struct DownloadReport {
    /// One outcome per input URL, in input order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Aggregate counts over `outcomes`.
    pub stats: DownloadStats,
}

/// Download engine for concurrent, independent PDF downloads.
///
/// # Concurrency Model
///
/// - URLs are grouped by destination filename; each group runs in its own
///   Tokio task, one URL after another, so distinct URLs sharing a filename
///   never race and the later ones find the earlier file and are skipped
/// - A semaphore permit is acquired before starting each group
/// - Permits are released automatically when a group completes (RAII)
/// - Distinct groups write distinct paths and share nothing but the
///   read-only output directory
///
/// No retries: a failed outcome is final for the run.
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    /// How destination filenames are derived.
    filename_style: FilenameStyle,
}

impl DownloadEngine {
    /// Creates a new download engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use harvester_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(4).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            filename_style: FilenameStyle::default(),
        })
    }

    /// Sets how destination filenames are derived.
    #[must_use]
    pub fn with_filename_style(mut self, style: FilenameStyle) -> Self {
        self.filename_style = style;
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the configured filename style.
    #[must_use]
    pub fn filename_style(&self) -> FilenameStyle {
        self.filename_style
    }

    /// Downloads every URL in `urls` into `output_dir`.
    ///
    /// `urls` must already be deduplicated; the output directory must exist.
    /// Individual failures never cause this method to error, they are
    /// reported as `Failed` outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    #[instrument(skip(self, client, urls), fields(count = urls.len(), output_dir = %output_dir.display()))]
    pub async fn download_all(
        &self,
        client: &HttpClient,
        urls: Vec<ResolvedUrl>,
        output_dir: &Path,
    ) -> Result<DownloadReport, EngineError> {
        let total = urls.len();
        let groups = group_by_filename(urls, self.filename_style);
        let mut handles = Vec::with_capacity(groups.len());

        info!(count = total, groups = groups.len(), "starting downloads");

        for group in groups {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let output_dir = output_dir.to_path_buf();
            let style = self.filename_style;
            let task_group = group.clone();

            let handle = tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                let mut outcomes = Vec::with_capacity(task_group.len());
                for (index, url) in task_group {
                    let outcome = download_pdf(&client, &url, &output_dir, style).await;
                    outcomes.push((index, outcome));
                }
                outcomes
            });
            handles.push((group, handle));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        let mut slots: Vec<Option<DownloadOutcome>> = vec![None; total];
        for (group, handle) in handles {
            match handle.await {
                Ok(outcomes) => {
                    for (index, outcome) in outcomes {
                        slots[index] = Some(outcome);
                    }
                }
                Err(e) => {
                    warn!(error = %e, urls = group.len(), "download task panicked");
                    for (index, url) in group {
                        let outcome = DownloadOutcome::Failed {
                            url,
                            kind: FailureKind::Aborted,
                            message: e.to_string(),
                        };
                        slots[index] = Some(outcome);
                    }
                }
            }
        }
        let outcomes: Vec<DownloadOutcome> = slots.into_iter().flatten().collect();

        let stats = DownloadStats::new();
        for outcome in &outcomes {
            stats.record(outcome);
        }

        info!(
            succeeded = stats.succeeded(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            total = stats.total(),
            "downloads complete"
        );

        Ok(DownloadReport { outcomes, stats })
    }
}

/// Buckets URLs by destination filename, keeping input order inside each
/// bucket and ordering buckets by first appearance.
fn group_by_filename(
    urls: Vec<ResolvedUrl>,
    style: FilenameStyle,
) -> Vec<Vec<(usize, ResolvedUrl)>> {
    let mut groups: Vec<Vec<(usize, ResolvedUrl)>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (index, url) in urls.into_iter().enumerate() {
        match by_name.entry(url_to_filename(url.as_str(), style)) {
            Entry::Occupied(entry) => {
                debug!(url = %url, filename = %entry.key(), "filename shared with an earlier URL");
                groups[*entry.get()].push((index, url));
            }
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                groups.push(vec![(index, url)]);
            }
        }
    }

    groups
}

/// Downloads one PDF into `output_dir` unless it is already there.
///
/// Never errors: every path ends in exactly one [`DownloadOutcome`].
#[instrument(skip(client, output_dir, style), fields(url = %url, host = %url.host().unwrap_or_default()))]
pub async fn download_pdf(
    client: &HttpClient,
    url: &ResolvedUrl,
    output_dir: &Path,
    style: FilenameStyle,
) -> DownloadOutcome {
    let path: PathBuf = output_dir.join(url_to_filename(url.as_str(), style));

    if is_regular_file(&path).await {
        info!(path = %path.display(), "file already exists, skipping");
        return DownloadOutcome::Skipped {
            url: url.clone(),
            path,
        };
    }

    let body = match client.fetch_pdf(url.as_str()).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, reason = %e.kind(), "download failed");
            return DownloadOutcome::failed(url.clone(), &e);
        }
    };

    match persist_once(&path, &body).await {
        Ok(Persisted::AlreadyPresent) => {
            info!(path = %path.display(), "file created by another writer, skipping");
            DownloadOutcome::Skipped {
                url: url.clone(),
                path,
            }
        }
        Ok(Persisted::Written(bytes)) => {
            info!(bytes, path = %path.display(), "downloaded");
            DownloadOutcome::Succeeded {
                url: url.clone(),
                path,
                bytes,
            }
        }
        Err(e) => {
            warn!(error = %e, reason = %e.kind(), "failed to write download");
            DownloadOutcome::failed(url.clone(), &e)
        }
    }
}
