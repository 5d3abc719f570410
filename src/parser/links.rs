//! PDF link extraction from raw page text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Regex pattern for finding PDF links in text.
///
/// Matches `http://` or `https://`, then any run of characters that are not
/// whitespace, quotes, or angle brackets, ending in a literal lowercase `.pdf`,
/// optionally followed by a `?query`. Tag structure is never parsed, so
/// malformed markup is tolerated.
#[allow(clippy::expect_used)]
static PDF_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>]+\.pdf(?:\?[^"'<>]*)?"#).expect("PDF URL regex is valid") // Static pattern, safe to panic
});

/// Extracts every distinct PDF URL found in `text`.
///
/// Results keep the order of first occurrence. A URL repeated verbatim is
/// reported once; URLs that differ only in their query string are distinct.
/// No matches is not an error and yields an empty vector.
///
/// # Examples
///
/// ```
/// use harvester_core::parser::extract_pdf_urls;
///
/// let html = r#"<a href="https://x.test/a.pdf">A</a> <a href="https://x.test/a.pdf?v=2">A2</a>"#;
/// assert_eq!(
///     extract_pdf_urls(html),
///     vec!["https://x.test/a.pdf", "https://x.test/a.pdf?v=2"]
/// );
/// ```
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn extract_pdf_urls(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut urls = Vec::new();

    for url_match in PDF_URL_PATTERN.find_iter(text) {
        let raw = url_match.as_str();
        if seen.insert(raw) {
            trace!(url = %raw, "found PDF link");
            urls.push(raw.to_string());
        }
    }

    if urls.is_empty() {
        debug!("no PDF URLs found");
    } else {
        debug!(count = urls.len(), "extracted PDF URLs");
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_query_variants_are_distinct_and_deduplicated() {
        let html = r#"
            <a href="https://x.test/a.pdf">one</a>
            <a href="https://x.test/a.pdf?v=2">two</a>
            <a href="https://x.test/a.pdf">one again</a>
            <a href="https://x.test/a.pdf?v=2">two again</a>
        "#;
        let urls = extract_pdf_urls(html);
        assert_eq!(urls, vec!["https://x.test/a.pdf", "https://x.test/a.pdf?v=2"]);
    }

    #[test]
    fn test_extract_empty_input_returns_empty() {
        assert!(extract_pdf_urls("").is_empty());
    }

    #[test]
    fn test_extract_page_without_pdfs_returns_empty() {
        let html = r#"<a href="https://x.test/index.html">home</a> https://x.test/report.docx"#;
        assert!(extract_pdf_urls(html).is_empty());
    }

    #[test]
    fn test_extract_is_case_sensitive_on_extension() {
        let html = r#"<a href="https://x.test/SHEET.PDF">upper</a>"#;
        assert!(extract_pdf_urls(html).is_empty());
    }

    #[test]
    fn test_extract_stops_at_space_inside_href() {
        // The space ends the candidate before any ".pdf" is seen.
        let html = r#"<a href="https://x.test/MSDS Sheet.pdf">spaced</a>"#;
        assert!(extract_pdf_urls(html).is_empty());
    }

    #[test]
    fn test_extract_keeps_first_occurrence_order() {
        let text = "https://b.test/2.pdf and http://a.test/1.pdf then https://b.test/2.pdf";
        assert_eq!(
            extract_pdf_urls(text),
            vec!["https://b.test/2.pdf", "http://a.test/1.pdf"]
        );
    }

    #[test]
    fn test_extract_tolerates_malformed_markup() {
        let html = "<div <a href=https://x.test/docs/guide.pdf>broken<<</div";
        assert_eq!(extract_pdf_urls(html), vec!["https://x.test/docs/guide.pdf"]);
    }

    #[test]
    fn test_extract_single_quoted_attribute() {
        let html = "<a href='https://x.test/sds/1234.pdf'>sds</a>";
        assert_eq!(extract_pdf_urls(html), vec!["https://x.test/sds/1234.pdf"]);
    }

    #[test]
    fn test_extract_query_runs_to_closing_quote() {
        let html = r#"<a href="https://x.test/f.pdf?id=7&lang=en">f</a>"#;
        assert_eq!(
            extract_pdf_urls(html),
            vec!["https://x.test/f.pdf?id=7&lang=en"]
        );
    }

    #[test]
    fn test_extract_ignores_non_http_schemes() {
        let html = r#"<a href="ftp://x.test/a.pdf">ftp</a> <a href="/relative/b.pdf">rel</a>"#;
        assert!(extract_pdf_urls(html).is_empty());
    }
}
