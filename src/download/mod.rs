//! PDF download stage: fetching, verification, naming, and persistence.
//!
//! This module turns resolved URLs into files on disk.
//!
//! # Features
//!
//! - One shared HTTP client with fixed timeouts (30s connect, 3min request)
//! - Deterministic, filesystem-safe filenames derived from the URL
//! - Status and `Content-Type` verification before anything is written
//! - Fully buffered bodies, persisted atomically; no partial or empty files
//! - Idempotence: an existing destination file short-circuits the download
//! - Bounded concurrency across independent downloads
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{FilenameStyle, HttpClient, download_pdf};
//! use harvester_core::parser::resolve_url;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = resolve_url("/sds/sheet.pdf", "https://cdn.example.com")?;
//! let outcome = download_pdf(&client, &url, Path::new("./PDFs"), FilenameStyle::Legacy).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod outcome;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_CONCURRENCY, MIN_CONCURRENCY, REQUEST_TIMEOUT_SECS};
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadReport, DownloadStats, EngineError, download_pdf,
};
pub use error::{DownloadError, FailureKind};
pub use filename::{FilenameStyle, url_to_filename};
pub use outcome::DownloadOutcome;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
