//! Constants for the download module (timeouts, concurrency bounds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default overall request timeout (3 minutes) so a stalled server cannot
/// hold a run indefinitely.
pub const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// MIME type a response must declare to be persisted.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Suffix of the staging file a body is written to before it is renamed
/// onto its final name.
pub const PARTIAL_SUFFIX: &str = ".part";
