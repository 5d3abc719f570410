//! Integration tests for the download module.
//!
//! These tests verify the full download flow with mock HTTP servers.

mod support;

use std::path::Path;
use std::time::Duration;

use harvester_core::download::{
    DownloadEngine, DownloadOutcome, FailureKind, FilenameStyle, HttpClient, download_pdf,
    url_to_filename,
};
use harvester_core::parser::{ResolvedUrl, resolve_url};
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

async fn mount_pdf(server: &MockServer, path_str: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(body.to_vec()),
        )
        .mount(server)
        .await;
}

fn resolved(server: &MockServer, path_str: &str) -> ResolvedUrl {
    resolve_url(&format!("{}{path_str}", server.uri()), &server.uri())
        .expect("mock URL should resolve")
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("failed to read output dir")
        .map(|entry| {
            entry
                .expect("bad dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_download_writes_exact_body_under_sanitized_name() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_pdf(&server, "/docs/msds-sheet.pdf", PDF_BYTES).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = resolved(&server, "/docs/msds-sheet.pdf");
    let outcome = download_pdf(&HttpClient::new(), &url, temp_dir.path(), FilenameStyle::Legacy).await;

    let expected_path = temp_dir.path().join("msds_sheet.pdf.pdf");
    match outcome {
        DownloadOutcome::Succeeded { path, bytes, .. } => {
            assert_eq!(path, expected_path);
            assert_eq!(bytes, PDF_BYTES.len() as u64);
        }
        other => panic!("Expected Succeeded, got: {other:?}"),
    }
    assert_eq!(std::fs::read(&expected_path).unwrap(), PDF_BYTES);
    assert_eq!(dir_entries(temp_dir.path()), vec!["msds_sheet.pdf.pdf"]);
}

#[tokio::test]
async fn test_download_twice_skips_second_time_without_request() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/a.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(PDF_BYTES.to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = HttpClient::new();
    let url = resolved(&server, "/a.pdf");

    let first = download_pdf(&client, &url, temp_dir.path(), FilenameStyle::Legacy).await;
    let second = download_pdf(&client, &url, temp_dir.path(), FilenameStyle::Legacy).await;

    assert!(first.is_succeeded(), "{first:?}");
    assert!(second.is_skipped(), "{second:?}");
    assert_eq!(first.path(), second.path());
    assert_eq!(dir_entries(temp_dir.path()).len(), 1);
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn test_download_html_with_200_fails_and_creates_nothing() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/login.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>please log in</html>"),
        )
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = resolved(&server, "/login.pdf");
    let outcome = download_pdf(&HttpClient::new(), &url, temp_dir.path(), FilenameStyle::Legacy).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidContentType));
    assert!(dir_entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_download_empty_body_fails_and_creates_nothing() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_pdf(&server, "/empty.pdf", b"").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = resolved(&server, "/empty.pdf");
    let outcome = download_pdf(&HttpClient::new(), &url, temp_dir.path(), FilenameStyle::Legacy).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::EmptyBody));
    assert!(dir_entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_download_bad_status_reports_code() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = resolved(&server, "/gone.pdf");
    let outcome = download_pdf(&HttpClient::new(), &url, temp_dir.path(), FilenameStyle::Legacy).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::BadStatus(404)));
    assert_eq!(
        outcome.failure_kind().map(|k| k.to_string()).as_deref(),
        Some("bad status: 404")
    );
    assert!(dir_entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_download_into_missing_directory_is_disk_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_pdf(&server, "/a.pdf", PDF_BYTES).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let missing = temp_dir.path().join("not-created");

    let url = resolved(&server, "/a.pdf");
    let outcome = download_pdf(&HttpClient::new(), &url, &missing, FilenameStyle::Legacy).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Disk));
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_download_single_extension_style() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_pdf(&server, "/sheet.pdf", PDF_BYTES).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = resolved(&server, "/sheet.pdf");
    let outcome = download_pdf(
        &HttpClient::new(),
        &url,
        temp_dir.path(),
        FilenameStyle::SingleExtension,
    )
    .await;

    assert!(outcome.is_succeeded(), "{outcome:?}");
    assert_eq!(dir_entries(temp_dir.path()), vec!["sheet.pdf"]);
}

#[tokio::test]
async fn test_engine_mixed_batch_keeps_input_order() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_pdf(&server, "/one.pdf", PDF_BYTES).await;
    mount_pdf(&server, "/three.pdf", PDF_BYTES).await;
    Mock::given(method("GET"))
        .and(path("/two.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(temp_dir.path().join("three.pdf.pdf"), b"existing").unwrap();

    let urls = vec![
        resolved(&server, "/one.pdf"),
        resolved(&server, "/two.pdf"),
        resolved(&server, "/three.pdf"),
    ];
    let engine = DownloadEngine::new(3).unwrap();
    let report = engine
        .download_all(&HttpClient::new(), urls.clone(), temp_dir.path())
        .await
        .unwrap();

    let outcome_urls: Vec<_> = report.outcomes.iter().map(DownloadOutcome::url).collect();
    assert_eq!(outcome_urls, urls.iter().collect::<Vec<_>>());
    assert!(report.outcomes[0].is_succeeded());
    assert_eq!(
        report.outcomes[1].failure_kind(),
        Some(FailureKind::BadStatus(500))
    );
    assert!(report.outcomes[2].is_skipped());
    assert_eq!(report.stats.succeeded(), 1);
    assert_eq!(report.stats.failed(), 1);
    assert_eq!(report.stats.skipped(), 1);
    // The pre-existing file is never overwritten.
    assert_eq!(
        std::fs::read(temp_dir.path().join("three.pdf.pdf")).unwrap(),
        b"existing"
    );
}

#[tokio::test]
async fn test_engine_concurrency_one_downloads_everything() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut urls = Vec::new();
    for i in 0..5 {
        let p = format!("/batch/doc-{i}.pdf");
        mount_pdf(&server, &p, PDF_BYTES).await;
        urls.push(resolved(&server, &p));
    }

    let report = DownloadEngine::new(1)
        .unwrap()
        .download_all(&HttpClient::new(), urls, temp_dir.path())
        .await
        .unwrap();

    assert_eq!(report.stats.succeeded(), 5);
    assert_eq!(dir_entries(temp_dir.path()).len(), 5);
}

#[tokio::test]
async fn test_engine_urls_sharing_a_filename_write_once() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/en/1001.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF english".to_vec())
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fr/1001.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF french".to_vec())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(0)
        .mount(&server)
        .await;
    mount_pdf(&server, "/en/2002.pdf", PDF_BYTES).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let urls = vec![
        resolved(&server, "/en/1001.pdf"),
        resolved(&server, "/fr/1001.pdf"),
        resolved(&server, "/en/2002.pdf"),
    ];
    let report = DownloadEngine::new(4)
        .unwrap()
        .download_all(&HttpClient::new(), urls, temp_dir.path())
        .await
        .unwrap();

    assert!(report.outcomes[0].is_succeeded(), "{:?}", report.outcomes[0]);
    assert!(report.outcomes[1].is_skipped(), "{:?}", report.outcomes[1]);
    assert!(report.outcomes[2].is_succeeded(), "{:?}", report.outcomes[2]);
    assert_eq!(report.stats.succeeded(), 2);
    assert_eq!(report.stats.skipped(), 1);
    assert_eq!(
        dir_entries(temp_dir.path()),
        vec!["1001.pdf.pdf", "2002.pdf.pdf"]
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("1001.pdf.pdf")).unwrap(),
        b"%PDF english"
    );
}

#[test]
fn test_sanitized_names_are_deterministic_and_distinct() {
    let urls = [
        "https://x.test/docs/a.pdf",
        "https://x.test/docs/b.pdf",
        "https://x.test/docs/a.pdf?v=2",
        "https://x.test/other/sheet-1.pdf",
        "https://x.test/other/sheet-2.pdf",
        "https://x.test/MSDS/Product%20Data.pdf",
    ];

    let names: Vec<String> = urls
        .iter()
        .map(|u| url_to_filename(u, FilenameStyle::Legacy))
        .collect();
    let again: Vec<String> = urls
        .iter()
        .map(|u| url_to_filename(u, FilenameStyle::Legacy))
        .collect();
    assert_eq!(names, again);

    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len(), "collision in {names:?}");
}
