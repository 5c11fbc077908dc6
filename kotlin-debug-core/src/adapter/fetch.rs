//! Retrieval of the adapter release asset.
//!
//! The asset is streamed straight to disk while its SHA-256 is computed, and
//! only release hosts on the allowlist are contacted.

use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use super::status::StatusReporter;
use super::types::AdapterRelease;

/// Hosts that adapter releases may be fetched from, subdomains included.
const RELEASE_HOSTS: &[&str] = &["github.com"];

/// Failure while fetching a release asset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Refusing to fetch {url}: {reason}")]
    RejectedUrl { url: String, reason: String },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Checksum mismatch for {asset}: expected {expected}, got {actual}")]
    Checksum {
        asset: &'static str,
        expected: String,
        actual: String,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How much of the asset has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    pub received: u64,
    /// Content-Length, when the server sent one.
    pub total: Option<u64>,
}

impl FetchProgress {
    /// Whole percent received, if the total size is known.
    pub fn percent(&self) -> Option<u8> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| (self.received.min(total) * 100 / total) as u8)
    }
}

/// Parses a release URL and checks it against the host allowlist.
pub(crate) fn release_url(raw: &str) -> Result<Url, FetchError> {
    let rejected = |reason: String| FetchError::RejectedUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| rejected(e.to_string()))?;
    if url.scheme() != "https" {
        return Err(rejected(format!(
            "scheme '{}' is not allowed, releases are fetched over https",
            url.scheme()
        )));
    }

    let host = url
        .domain()
        .ok_or_else(|| rejected("a release host name is required".to_string()))?;
    let trusted = RELEASE_HOSTS.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(*allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    });
    if !trusted {
        return Err(rejected(format!("host '{host}' is not allowed")));
    }

    Ok(url)
}

/// Streams the asset of `release` into `dest`.
///
/// Returns the asset size in bytes. On any failure, including a checksum
/// mismatch, the partially written `dest` is removed.
pub async fn fetch_release(
    release: &AdapterRelease,
    dest: &Path,
    status: &dyn StatusReporter,
) -> Result<u64, FetchError> {
    let url = release_url(release.url)?;
    info!(%url, dest = %dest.display(), "Fetching {} v{}", release.display_name, release.version);

    let fetched = stream_to_file(url, dest, status).await;
    let result = fetched.and_then(|(size, digest)| {
        verify_checksum(release, digest)?;
        Ok(size)
    });

    if result.is_err() && dest.exists() {
        if let Err(e) = tokio::fs::remove_file(dest).await {
            debug!("Could not remove partial asset {}: {}", dest.display(), e);
        }
    }
    result
}

async fn stream_to_file(
    url: Url,
    dest: &Path,
    status: &dyn StatusReporter,
) -> Result<(u64, String), FetchError> {
    let url_text = url.to_string();
    let request_failed = |source: reqwest::Error| FetchError::Request {
        url: url_text.clone(),
        source,
    };
    let write_failed = |source: std::io::Error| FetchError::Write {
        path: dest.display().to_string(),
        source,
    };

    let response = reqwest::get(url).await.map_err(request_failed)?;
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url_text.clone(),
            status: response.status(),
        });
    }

    let mut progress = FetchProgress {
        received: 0,
        total: response.content_length(),
    };
    status.progress(&progress);

    let mut file = tokio::fs::File::create(dest).await.map_err(write_failed)?;
    let mut hasher = Sha256::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(request_failed)?;
        hasher.update(&chunk);
        file.write_all(&chunk).await.map_err(write_failed)?;
        progress.received += chunk.len() as u64;
        status.progress(&progress);
    }
    file.flush().await.map_err(write_failed)?;

    Ok((progress.received, to_hex(&hasher.finalize())))
}

fn verify_checksum(release: &AdapterRelease, actual: String) -> Result<(), FetchError> {
    match release.sha256 {
        Some(expected) if !expected.eq_ignore_ascii_case(&actual) => Err(FetchError::Checksum {
            asset: release.asset_name,
            expected: expected.to_string(),
            actual,
        }),
        Some(_) => {
            debug!(sha256 = %actual, "Release checksum verified");
            Ok(())
        }
        None => Ok(()),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::catalog::kotlin_debug_adapter;
    use crate::adapter::status::testing::RecordingStatus;
    use tempfile::TempDir;

    #[test]
    fn test_percent() {
        let half = FetchProgress {
            received: 50,
            total: Some(100),
        };
        assert_eq!(half.percent(), Some(50));

        let unknown = FetchProgress {
            received: 50,
            total: None,
        };
        assert_eq!(unknown.percent(), None);

        let empty = FetchProgress {
            received: 0,
            total: Some(0),
        };
        assert_eq!(empty.percent(), None);

        // A server that under-reports its length never goes past 100
        let overrun = FetchProgress {
            received: 150,
            total: Some(100),
        };
        assert_eq!(overrun.percent(), Some(100));
    }

    #[test]
    fn test_release_url_allowlist() {
        assert!(release_url(kotlin_debug_adapter().url).is_ok());
        assert!(release_url("https://objects.github.com/adapter.zip").is_ok());

        for rejected in [
            "http://github.com/adapter.zip",
            "https://evil.com/adapter.zip",
            "https://notgithub.com/adapter.zip",
            "https://github.com.evil.org/adapter.zip",
            "https://140.82.112.3/adapter.zip",
            "file:///etc/passwd",
            "not-a-url",
        ] {
            let err = release_url(rejected).unwrap_err();
            assert!(matches!(err, FetchError::RejectedUrl { .. }), "{rejected}");
        }
    }

    #[test]
    fn test_verify_checksum() {
        let empty_sha = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(to_hex(&Sha256::digest(b"")), empty_sha);

        let mut release = *kotlin_debug_adapter();
        assert!(verify_checksum(&release, "anything".to_string()).is_ok());

        release.sha256 = Some("E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855");
        assert!(verify_checksum(&release, empty_sha.to_string()).is_ok());

        let err = verify_checksum(&release, "00".repeat(32)).unwrap_err();
        assert!(matches!(err, FetchError::Checksum { asset: "adapter.zip", .. }));
    }

    #[tokio::test]
    async fn test_rejected_url_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("adapter.zip");
        let mut release = *kotlin_debug_adapter();
        release.url = "http://example.com/adapter.zip";
        let status = RecordingStatus::default();

        let err = fetch_release(&release, &dest, &status).await.unwrap_err();

        assert!(err.to_string().contains("not allowed"));
        assert!(!dest.exists());
    }
}
