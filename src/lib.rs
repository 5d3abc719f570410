//! PDF Harvester Core Library
//!
//! This library scrapes seed pages for linked PDF documents, resolves the
//! links to absolute URLs, and downloads every unique document exactly once
//! into a flat output directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - PDF link extraction, URL resolution, and run-wide dedup
//! - [`download`] - HTTP client, filename sanitizer, verified downloads, worker pool
//! - [`pipeline`] - Seed page → links → resolved URLs → files on disk
//! - [`config`] - TOML file configuration with defaults
//!
//! Data flows in one direction only: seed URL → page text → PDF links →
//! resolved URLs → downloaded files. No stage keeps state beyond the run.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod parser;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{
    ConfigError, HarvestConfig, load_config, load_default_config, resolve_default_config_path,
};
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome, DownloadReport,
    DownloadStats, EngineError, FailureKind, FilenameStyle, HttpClient, download_pdf,
    url_to_filename,
};
pub use parser::{ResolveError, ResolvedUrl, UrlSet, extract_pdf_urls, resolve_url};
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport, RejectedUrl, SeedFailure};
