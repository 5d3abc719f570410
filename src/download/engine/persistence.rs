//! Write-once persistence of fully buffered downloads.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::super::constants::PARTIAL_SUFFIX;
use super::super::error::DownloadError;

/// Distinguishes staging files of concurrent writers within one process.
static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// What [`persist_once`] did with the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Persisted {
    /// The destination was created with this many bytes.
    Written(u64),
    /// Another writer created the destination first; it was left untouched.
    AlreadyPresent,
}

/// Writes `contents` to `destination` unless a file already exists there.
///
/// The bytes go to a private `.part` sibling first, are flushed and synced,
/// then hard-linked onto `destination`. Linking never replaces an existing
/// file, so the first complete writer wins and the destination only ever
/// appears complete. The sibling is removed in every case.
pub(super) async fn persist_once(
    destination: &Path,
    contents: &[u8],
) -> Result<Persisted, DownloadError> {
    let staging = staging_path(destination);

    if let Err(error) = write_staging(&staging, contents).await {
        discard_staging(&staging).await;
        return Err(error);
    }

    let linked = tokio::fs::hard_link(&staging, destination).await;
    discard_staging(&staging).await;

    match linked {
        Ok(()) => {
            debug!(path = %destination.display(), bytes = contents.len(), "persisted download");
            Ok(Persisted::Written(contents.len() as u64))
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && is_regular_file(destination).await => {
            debug!(path = %destination.display(), "destination appeared meanwhile, keeping it");
            Ok(Persisted::AlreadyPresent)
        }
        Err(source) => Err(DownloadError::io(destination, source)),
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let sequence = STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut name: OsString = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!(".{}-{sequence}{PARTIAL_SUFFIX}", std::process::id()));
    destination.with_file_name(name)
}

async fn write_staging(staging: &Path, contents: &[u8]) -> Result<(), DownloadError> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(staging)
        .await
        .map_err(|e| DownloadError::io(staging, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| DownloadError::io(staging, e))?;
    file.flush()
        .await
        .map_err(|e| DownloadError::io(staging, e))?;
    file.sync_all()
        .await
        .map_err(|e| DownloadError::io(staging, e))?;
    Ok(())
}

pub(super) async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

async fn discard_staging(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Ok(()) => debug!(path = %staging.display(), "removed staging file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %staging.display(), error = %e, "failed to remove staging file"),
    }
}
