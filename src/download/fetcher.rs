//! Size-bounded streaming transfer of one candidate URL.
//!
//! The transfer runs in three guarded stages: a best-effort HEAD pre-flight,
//! a chunked streaming GET that checks the running total before every write,
//! and a final on-disk size check. Any file created along the way is removed
//! on every non-success path, including cancellation of the fetch future.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::FetchError;
use super::filename::{choose_extension, create_output_file};
use super::limit::SizeLimit;
use crate::media::MediaKind;
use crate::session::Session;

/// Write increment; the ceiling is checked before each one.
pub const WRITE_CHUNK_SIZE: usize = 64 * 1024;

/// A completed, within-limit transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Where the media was written.
    pub path: PathBuf,
    /// Size on disk.
    pub bytes: u64,
}

/// Streams candidate media into an output directory under a size ceiling.
#[derive(Debug, Clone)]
pub struct BoundedFetcher {
    output_dir: PathBuf,
}

impl BoundedFetcher {
    /// Creates a fetcher writing into `output_dir` (created on demand).
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory new files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetches `url` as `kind`, refusing anything larger than `limit`.
    ///
    /// Creates at most one file and leaves none behind unless it succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::TooLarge`] when the pre-flight size is over the
    /// limit, [`FetchError::ExceededLimit`] when the body grows past it, and
    /// transport, status or IO errors otherwise.
    #[instrument(skip(self, session), fields(url = %url, kind = %kind, limit = limit.bytes()))]
    pub async fn fetch(
        &self,
        session: &Session,
        url: &str,
        kind: MediaKind,
        limit: SizeLimit,
    ) -> Result<FetchedFile, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        match session.head(url).await {
            Ok(headers) => {
                if let Some(reported) = content_length(&headers)
                    && !limit.allows(reported)
                {
                    return Err(FetchError::too_large(url, reported, limit.bytes()));
                }
            }
            Err(error) => debug!(error = %error, "HEAD pre-flight unavailable; streaming anyway"),
        }

        let response = session.get_stream(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let extension = choose_extension(kind, url, content_type.as_deref());

        let (file, path) = create_output_file(&self.output_dir, kind, extension).await?;
        let partial = PartialFile::new(path);
        debug!(path = %partial.path().display(), "streaming to file");

        let streamed = stream_within_limit(file, response, url, partial.path(), limit).await;
        let received = match streamed {
            Ok(received) => received,
            Err(error) => {
                partial.discard().await;
                return Err(error);
            }
        };

        let stat = tokio::fs::metadata(partial.path()).await;
        let on_disk = match stat {
            Ok(meta) => meta.len(),
            Err(e) => {
                let error = FetchError::io(partial.path(), e);
                partial.discard().await;
                return Err(error);
            }
        };
        if !limit.allows(on_disk) {
            partial.discard().await;
            return Err(FetchError::exceeded_limit(url, on_disk, limit.bytes()));
        }
        if on_disk == 0 {
            partial.discard().await;
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        let path = partial.keep();
        info!(path = %path.display(), bytes = on_disk, streamed = received, "media saved");
        Ok(FetchedFile {
            path,
            bytes: on_disk,
        })
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Streams the response body into `file`, refusing to write past `limit`.
async fn stream_within_limit(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    limit: SizeLimit,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;

        for piece in chunk.chunks(WRITE_CHUNK_SIZE) {
            let next_total = received.saturating_add(piece.len() as u64);
            if !limit.allows(next_total) {
                debug!(received = next_total, "size ceiling crossed; aborting transfer");
                return Err(FetchError::exceeded_limit(url, next_total, limit.bytes()));
            }
            writer
                .write_all(piece)
                .await
                .map_err(|e| FetchError::io(file_path, e))?;
            received = next_total;
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path, e))?;

    Ok(received)
}

/// Owns a freshly created output file until the transfer is accepted.
///
/// Dropping it while armed (an error path that forgot to discard, or the
/// fetch future being cancelled mid-stream) removes the file synchronously.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file.
    async fn discard(mut self) {
        debug!(path = %self.path.display(), "removing partial file");
        let removed = tokio::fs::remove_file(&self.path).await;
        self.armed = false;
        if let Err(e) = removed
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove partial file");
        }
    }

    /// Accepts the file and hands its path to the caller.
    fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            debug!(path = %self.path.display(), "transfer abandoned; removing partial file");
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
