//! Deterministic local filenames for downloaded documents.
//!
//! Every resolved URL maps to exactly one filename, so the existence of that
//! file in the output directory is the authoritative "already downloaded"
//! marker across runs.

use serde::{Deserialize, Serialize};

/// Stem used when a URL's last segment has no alphanumeric characters.
const FALLBACK_STEM: &str = "download";

/// Longest stem kept, leaving room for extensions under the 255-byte
/// filename limit of common filesystems.
const MAX_STEM_LEN: usize = 200;

/// Longest extension (without the dot) recognized in a URL segment.
const MAX_EXTENSION_LEN: usize = 10;

/// How the trailing `.pdf` is attached to a sanitized name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameStyle {
    /// Detected extension plus a literal `.pdf` (`sheet.pdf` → `sheet.pdf.pdf`).
    ///
    /// Matches names written by earlier runs, so existing downloads are skipped.
    #[default]
    Legacy,
    /// Never repeats `.pdf` (`sheet.pdf` → `sheet.pdf`, `view.php` → `view.php.pdf`).
    SingleExtension,
}

/// Maps a URL to a safe, lowercase filename ending in `.pdf`.
///
/// 1. Lowercase the URL.
/// 2. Take the last path segment (query string kept, so URLs differing only
///    in their query map to different names) and its extension.
/// 3. Replace every run of characters outside `[a-z0-9]` with one `_` and
///    strip a single leading `_`.
/// 4. Strip a trailing `_<ext>` left behind by step 3 eating the extension dot.
/// 5. Append the extension and `.pdf` according to `style`.
///
/// This is a pure, total function.
///
/// # Examples
///
/// ```
/// use harvester_core::download::{FilenameStyle, url_to_filename};
///
/// assert_eq!(
///     url_to_filename("https://x.test/msds-sheet.pdf", FilenameStyle::Legacy),
///     "msds_sheet.pdf.pdf"
/// );
/// assert_eq!(
///     url_to_filename("https://x.test/msds-sheet.pdf", FilenameStyle::SingleExtension),
///     "msds_sheet.pdf"
/// );
/// ```
#[must_use]
pub fn url_to_filename(url: &str, style: FilenameStyle) -> String {
    let lowercase = url.to_lowercase();
    let (segment, suffix) = last_segment(&lowercase);
    let extension = extension_of(segment);

    let base = format!("{segment}{suffix}");
    let mut stem = replace_unsafe_runs(&base);
    if let Some(trimmed) = stem.strip_prefix('_') {
        stem = trimmed.to_string();
    }
    if let Some(ext) = extension.strip_prefix('.') {
        let redundant = format!("_{ext}");
        if let Some(trimmed) = stem.strip_suffix(&redundant) {
            stem = trimmed.to_string();
        }
    }
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    // Stem is pure ASCII, so any byte index is a char boundary.
    stem.truncate(MAX_STEM_LEN);

    match style {
        FilenameStyle::SingleExtension if extension == ".pdf" => format!("{stem}.pdf"),
        _ => format!("{stem}{extension}.pdf"),
    }
}

/// Splits a URL into its last path segment and the trailing `?query`/`#fragment`.
fn last_segment(url: &str) -> (&str, &str) {
    let split_at = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split_at);
    let path = path.trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or(path);
    (segment, suffix)
}

/// Extension including the leading dot, or empty when the segment has none.
fn extension_of(segment: &str) -> String {
    let Some(dot_index) = segment.rfind('.') else {
        return String::new();
    };
    let ext = &segment[dot_index + 1..];
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return String::new();
    }
    format!(".{ext}")
}

fn replace_unsafe_runs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    out
}
