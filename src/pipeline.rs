//! Seed-to-disk driver.
//!
//! A run fetches every seed page, extracts candidate PDF links, resolves them
//! against the base domain, deduplicates them across the whole run, and hands
//! the unique list to the [`DownloadEngine`]. Nothing in a run is fatal: a
//! seed that cannot be fetched, a link that cannot be resolved, and a
//! download that fails are each recorded in the [`PipelineReport`] and the
//! run moves on.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::download::{
    DownloadEngine, DownloadError, DownloadOutcome, FailureKind, FilenameStyle, HttpClient,
};
use crate::parser::{ResolvedUrl, UrlSet, extract_pdf_urls, resolve_url};

/// Directory permissions for a freshly created output directory.
#[cfg(unix)]
const OUTPUT_DIR_MODE: u32 = 0o755;

/// Run-wide settings for a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Prefix joined onto links that carry no host.
    pub base_domain: String,
    /// Flat directory receiving the downloaded documents.
    pub output_dir: PathBuf,
    /// How destination filenames are derived.
    pub filename_style: FilenameStyle,
}

/// A seed page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedFailure {
    pub seed: String,
    pub message: String,
}

/// An extracted link that did not resolve to a downloadable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedUrl {
    pub url: String,
    pub reason: String,
}

/// Everything that happened during one run.
#[derive(Debug, Default, Serialize)]
pub struct PipelineReport {
    /// Number of seed pages attempted.
    pub seeds: usize,
    /// Seeds whose page fetch failed.
    pub seed_failures: Vec<SeedFailure>,
    /// Links extracted across all seeds, before cross-seed dedup.
    pub links_found: usize,
    /// Distinct resolved URLs handed to the downloader.
    pub unique_urls: usize,
    /// Links dropped during resolution.
    pub rejected: Vec<RejectedUrl>,
    /// One outcome per unique URL, in discovery order.
    pub outcomes: Vec<DownloadOutcome>,
}

impl PipelineReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_succeeded()).count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Drives one harvesting run over a set of seed pages.
#[derive(Debug)]
pub struct Pipeline {
    client: HttpClient,
    engine: DownloadEngine,
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline. The engine's filename style is aligned with
    /// `options.filename_style`.
    #[must_use]
    pub fn new(client: HttpClient, engine: DownloadEngine, options: PipelineOptions) -> Self {
        let engine = engine.with_filename_style(options.filename_style);
        Self {
            client,
            engine,
            options,
        }
    }

    /// Creates the output directory (and parents) if it does not exist.
    ///
    /// New directories get mode `0o755` on Unix.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if the directory cannot be created, or
    /// if the path exists and is not a directory.
    pub async fn ensure_output_dir(&self) -> Result<(), DownloadError> {
        create_output_dir(&self.options.output_dir).await
    }

    /// Runs every seed to completion and reports what happened.
    ///
    /// The output directory must already exist; see
    /// [`Pipeline::ensure_output_dir`].
    #[instrument(skip(self, seeds), fields(seeds = seeds.len(), output_dir = %self.options.output_dir.display()))]
    pub async fn run(&self, seeds: &[String]) -> PipelineReport {
        let mut report = PipelineReport {
            seeds: seeds.len(),
            ..PipelineReport::default()
        };
        let mut unique = UrlSet::new();

        for seed in seeds {
            let page = match self.client.fetch_text(seed).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(seed = %seed, error = %e, "failed to fetch seed page, skipping");
                    report.seed_failures.push(SeedFailure {
                        seed: seed.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let links = extract_pdf_urls(&page);
            info!(seed = %seed, links = links.len(), "extracted PDF links");
            report.links_found += links.len();

            for link in links {
                match resolve_url(&link, &self.options.base_domain) {
                    Ok(resolved) => {
                        if !unique.insert(resolved) {
                            debug!(url = %link, "duplicate link, already queued");
                        }
                    }
                    Err(e) => {
                        warn!(url = %link, error = %e, "rejected link");
                        report.rejected.push(RejectedUrl {
                            url: link,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        report.unique_urls = unique.len();
        let urls = unique.into_vec();
        report.outcomes = self.download(urls).await;

        info!(
            unique_urls = report.unique_urls,
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            seed_failures = report.seed_failures.len(),
            "run complete"
        );
        report
    }

    async fn download(&self, urls: Vec<ResolvedUrl>) -> Vec<DownloadOutcome> {
        if urls.is_empty() {
            return Vec::new();
        }

        match self
            .engine
            .download_all(&self.client, urls.clone(), &self.options.output_dir)
            .await
        {
            Ok(report) => report.outcomes,
            Err(e) => {
                warn!(error = %e, "download engine stopped, marking remaining URLs failed");
                urls.into_iter()
                    .map(|url| DownloadOutcome::Failed {
                        url,
                        kind: FailureKind::Aborted,
                        message: e.to_string(),
                    })
                    .collect()
            }
        }
    }
}

async fn create_output_dir(path: &Path) -> Result<(), DownloadError> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(OUTPUT_DIR_MODE);

    builder
        .create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    debug!(path = %path.display(), "output directory ready");
    Ok(())
}
