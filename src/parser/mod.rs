//! Page parsing module for discovering and normalizing PDF links.
//!
//! This module turns raw page text into a deduplicated list of absolute,
//! syntactically valid PDF URLs.
//!
//! # Stages
//!
//! - [`extract_pdf_urls`] - scans raw text (HTML or otherwise) for PDF links
//! - [`resolve_url`] - anchors host-less links on a base domain and validates them
//! - [`UrlSet`] - run-wide, insertion-ordered dedup of resolved URLs
//!
//! # Example
//!
//! ```
//! use harvester_core::parser::{UrlSet, extract_pdf_urls, resolve_url};
//!
//! let page = r#"<a href="https://x.test/a.pdf">A</a> <a href="https://x.test/a.pdf">again</a>"#;
//! let mut unique = UrlSet::new();
//! for raw in extract_pdf_urls(page) {
//!     let resolved = resolve_url(&raw, "https://base.test").unwrap();
//!     unique.insert(resolved);
//! }
//! assert_eq!(unique.len(), 1);
//! ```

mod error;
mod links;
mod resolve;
mod url_set;

pub use error::{MAX_URL_LENGTH, ResolveError};
pub use links::extract_pdf_urls;
pub use resolve::{ResolvedUrl, resolve_url};
pub use url_set::UrlSet;
