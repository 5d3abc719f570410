//! HTTP client wrapper for page fetches and PDF downloads.
//!
//! This module provides the `HttpClient` struct: one connection-pooling
//! `reqwest::Client` with fixed timeouts, shared by every stage of a run.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, PDF_CONTENT_TYPE, REQUEST_TIMEOUT_SECS};
use super::error::DownloadError;

/// Upper bound on the capacity reserved up front from `Content-Length`.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// HTTP client for fetching seed pages and PDF bodies.
///
/// This client is designed to be created once and reused for the whole run,
/// taking advantage of connection pooling. It is stateless from the caller's
/// point of view and safe to clone into concurrent tasks.
///
/// No custom request headers are sent.
///
/// # Example
///
/// ```no_run
/// use harvester_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let page = client.fetch_text("https://example.com/library").await?;
/// let pdf = client.fetch_pdf("https://example.com/sheet.pdf").await?;
/// println!("{} bytes of page, {} bytes of PDF", page.len(), pdf.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Overall request timeout: 3 minutes
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, request_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a page and returns its body as text.
    ///
    /// The status code is not interpreted: a non-success page is logged and
    /// its body returned anyway, since it may still contain links.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails
    /// (DNS, connect, timeout), or the body cannot be read.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "page returned non-success status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }

    /// Fetches a PDF and returns the fully buffered body.
    ///
    /// The response must have status 200, a `Content-Type` containing
    /// `application/pdf`, and a non-empty body. Nothing is written to disk
    /// here; callers persist the returned buffer only after it is complete.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] if the URL does not parse
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on transport failure,
    ///   including a body interrupted mid-stream
    /// - [`DownloadError::HttpStatus`] for any status other than 200
    /// - [`DownloadError::InvalidContentType`] when the header is missing or not PDF
    /// - [`DownloadError::EmptyBody`] when zero bytes were received
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type
            .to_ascii_lowercase()
            .contains(PDF_CONTENT_TYPE)
        {
            return Err(DownloadError::invalid_content_type(url, content_type));
        }

        let body = buffer_body(response, url).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        debug!(bytes = body.len(), "buffered PDF body");
        Ok(body)
    }
}

/// Reads the whole response body into memory.
async fn buffer_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(MAX_PREALLOCATION);
    let mut buffer = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer)
}
