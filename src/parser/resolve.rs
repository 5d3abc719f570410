//! Resolution of extracted links into absolute, fetchable URLs.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::error::{MAX_URL_LENGTH, ResolveError};

/// An absolute http(s) URL with a host, produced only by [`resolve_url`].
///
/// The string is kept exactly as resolved (no normalization by the URL
/// parser), so equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResolvedUrl(String);

impl ResolvedUrl {
    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the host component.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.0)
            .ok()
            .and_then(|u| u.host_str().map(std::string::ToString::to_string))
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves a raw link against `base_domain`.
///
/// - If `raw` parses with a non-empty host, it is used unchanged.
/// - Otherwise (domain-relative links such as `/docs/sheet.pdf`, or anything
///   that fails to parse), the result is `base_domain` followed by `raw`.
///
/// The combined string must then be a valid http(s) URL with a host, or the
/// link is rejected.
///
/// # Errors
///
/// Returns [`ResolveError`] when the resolved string is too long, does not
/// parse, uses a scheme other than http/https, or has no host.
///
/// # Examples
///
/// ```
/// use harvester_core::parser::resolve_url;
///
/// let resolved = resolve_url("/docs/sheet.pdf", "https://base.test").unwrap();
/// assert_eq!(resolved.as_str(), "https://base.test/docs/sheet.pdf");
///
/// let absolute = resolve_url("https://other.test/x.pdf", "https://base.test").unwrap();
/// assert_eq!(absolute.as_str(), "https://other.test/x.pdf");
/// ```
#[tracing::instrument(level = "trace", skip(base_domain))]
pub fn resolve_url(raw: &str, base_domain: &str) -> Result<ResolvedUrl, ResolveError> {
    let candidate = if host_of(raw).is_some() {
        raw.to_string()
    } else {
        trace!(base = %base_domain, "link has no host; prefixing base domain");
        format!("{base_domain}{raw}")
    };

    validate_request_url(&candidate)?;
    debug!(url = %candidate, "resolved URL");
    Ok(ResolvedUrl(candidate))
}

fn host_of(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(std::string::ToString::to_string))
        .filter(|host| !host.is_empty())
}

/// Validation rules:
/// - Must not exceed [`MAX_URL_LENGTH`]
/// - Must be parseable by the `url` crate
/// - Must use http or https
/// - Must have a host
fn validate_request_url(candidate: &str) -> Result<(), ResolveError> {
    if candidate.len() > MAX_URL_LENGTH {
        return Err(ResolveError::too_long(candidate));
    }

    let parsed =
        Url::parse(candidate).map_err(|e| ResolveError::malformed(candidate, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ResolveError::unsupported_scheme(candidate, scheme)),
    }

    if parsed.host().is_none() {
        return Err(ResolveError::no_host(candidate));
    }

    Ok(())
}
