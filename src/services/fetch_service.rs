//! Remote-URL fetch: pulls a file from an HTTP(S) URL into the storage
//! root. The response body is streamed chunk by chunk straight to disk, so
//! memory use stays bounded regardless of the remote file size.

use crate::services::storage_service::{StorageError, StorageService, sanitize_name};
use futures::StreamExt;
use reqwest::{Client, StatusCode, Url, redirect::Policy};
use std::{io, time::Duration};
use thiserror::Error;
use tracing::info;

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout in seconds. A stalled remote server cannot hold a
/// worker past this.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for outbound requests.
const USER_AGENT: &str = "filehub/0.1";

/// Name used when the URL path yields no usable filename.
const DEFAULT_REMOTE_NAME: &str = "downloaded_file";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote server returned {0}")]
    BadStatus(StatusCode),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of a successful fetch: the sanitized remote filename (for the
/// status message) and the name the file was stored under.
#[derive(Debug)]
pub struct Fetched {
    pub filename: String,
    pub stored_name: String,
}

/// Remote file fetcher with bounded timeouts.
#[derive(Clone)]
pub struct FetchService {
    client: Client,
}

impl FetchService {
    /// Create a new fetcher with default settings.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Download `url` into the storage root.
    ///
    /// The candidate filename is the last path segment of the URL (the
    /// query string is not part of the path), falling back to a fixed
    /// placeholder for bare hosts and trailing slashes. Any non-success
    /// status or transport failure is reported as an error; no retries.
    pub async fn fetch_to_storage(
        &self,
        url: &str,
        storage: &StorageService,
    ) -> Result<Fetched, FetchError> {
        let parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        let filename = sanitize_name(&remote_filename(&parsed));

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other));
        let stored_name = storage.save(&filename, stream).await?;

        info!(url, name = %stored_name, "fetched remote file");
        Ok(Fetched {
            filename,
            stored_name,
        })
    }
}

/// Candidate filename from a URL: the last non-empty path segment.
fn remote_filename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_REMOTE_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_for(url: &str) -> String {
        remote_filename(&Url::parse(url).expect("parse"))
    }

    #[test]
    fn filename_is_last_path_segment() {
        assert_eq!(name_for("https://example.com/files/report.pdf"), "report.pdf");
    }

    #[test]
    fn filename_excludes_query_string() {
        assert_eq!(
            name_for("https://example.com/dl/archive.zip?sig=abc&x=1"),
            "archive.zip"
        );
    }

    #[test]
    fn filename_defaults_when_path_is_empty() {
        assert_eq!(name_for("https://example.com"), DEFAULT_REMOTE_NAME);
        assert_eq!(name_for("https://example.com/"), DEFAULT_REMOTE_NAME);
        assert_eq!(name_for("https://example.com/dir/"), DEFAULT_REMOTE_NAME);
    }
}
