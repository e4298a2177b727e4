//! Resolve-and-fetch pipeline for a single pin URL.
//!
//! [`MediaResolver`] turns a page URL into one local media file:
//!
//! 1. [`UrlClassifier`] rejects anything outside the Pinterest domain family
//!    before any network traffic.
//! 2. The page is fetched through the resolver's [`SessionManager`].
//! 3. [`MediaExtractor`] collects video and image candidates.
//! 4. Candidates are tried strictly one at a time: at most
//!    [`MAX_VIDEO_ATTEMPTS`] videos, then at most [`MAX_IMAGE_ATTEMPTS`]
//!    images. The first successful [`BoundedFetcher`] transfer wins.
//! 5. The session is released on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use pinfetch_core::config::ResolverConfig;
//! use pinfetch_core::download::SizeLimit;
//! use pinfetch_core::resolver::MediaResolver;
//!
//! # async fn example() {
//! let mut resolver = MediaResolver::new(ResolverConfig::default());
//! match resolver.resolve("https://pin.it/AbCdEf", SizeLimit::DEFAULT).await {
//!     Ok(media) => println!("{} -> {}", media.message(), media.path.display()),
//!     Err(error) => println!("{error}"),
//! }
//! # }
//! ```

mod error;

pub use error::ResolveError;

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::classifier::UrlClassifier;
use crate::config::ResolverConfig;
use crate::download::{BoundedFetcher, FetchedFile, SizeLimit, human_bytes};
use crate::extract::{MediaCandidateSet, MediaExtractor};
use crate::media::MediaKind;
use crate::session::{Session, SessionManager};

/// Video candidates tried per resolution, in discovery order.
pub const MAX_VIDEO_ATTEMPTS: usize = 3;

/// Image candidates tried per resolution when no video succeeded.
pub const MAX_IMAGE_ATTEMPTS: usize = 5;

/// Media delivered by a successful resolution.
///
/// The file belongs to the caller, who is responsible for deleting it.
/// Serializes to the JSON object printed by `pinfetch --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedMedia {
    /// Local file holding the media.
    pub path: PathBuf,
    /// Whether a video or an image was delivered.
    pub kind: MediaKind,
    /// Size on disk.
    pub bytes: u64,
    /// Candidate URL the media was fetched from.
    pub source_url: String,
    /// Page URL the resolution started from.
    pub page_url: String,
    /// Page title, empty when the page had none.
    pub title: String,
    /// Page description, empty when the page had none.
    pub description: String,
}

impl DownloadedMedia {
    fn new(
        fetched: FetchedFile,
        kind: MediaKind,
        source_url: &str,
        page_url: &str,
        candidates: &MediaCandidateSet,
    ) -> Self {
        Self {
            path: fetched.path,
            kind,
            bytes: fetched.bytes,
            source_url: source_url.to_string(),
            page_url: page_url.to_string(),
            title: candidates.title.clone(),
            description: candidates.description.clone(),
        }
    }

    /// Human-readable status line for the caller to relay.
    #[must_use]
    pub fn message(&self) -> String {
        let size = human_bytes(self.bytes);
        if self.title.is_empty() {
            format!("Downloaded {} ({size})", self.kind)
        } else {
            format!("Downloaded {} ({size}): {}", self.kind, self.title)
        }
    }
}

/// Resolves pin URLs to local media files.
///
/// Each resolver owns at most one open session; use one resolver per
/// concurrent resolution.
#[derive(Debug)]
pub struct MediaResolver {
    classifier: UrlClassifier,
    extractor: MediaExtractor,
    fetcher: BoundedFetcher,
    sessions: SessionManager,
}

impl MediaResolver {
    /// Creates a resolver with the default classifier and extractor.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            classifier: UrlClassifier::default(),
            extractor: MediaExtractor::default(),
            fetcher: BoundedFetcher::new(config.output_dir),
            sessions: SessionManager::new(config.session),
        }
    }

    /// Replaces the URL classifier (e.g. to accept a mirror host).
    #[must_use]
    pub fn with_classifier(mut self, classifier: UrlClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the media extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: MediaExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Returns true while the resolver holds an open session.
    #[must_use]
    pub fn has_open_session(&self) -> bool {
        self.sessions.is_open()
    }

    /// Resolves `page_url` and fetches its media under `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotTargetUrl`] without network I/O for
    /// non-Pinterest input, `Session`/`PageFetch`/`PageStatus` when the page
    /// cannot be loaded, and [`ResolveError::NoMediaFound`] when no candidate
    /// could be fetched.
    #[instrument(skip(self), fields(limit = limit.bytes()))]
    pub async fn resolve(
        &mut self,
        page_url: &str,
        limit: SizeLimit,
    ) -> Result<DownloadedMedia, ResolveError> {
        if !self.classifier.is_target(page_url) {
            debug!("rejected non-Pinterest URL");
            return Err(ResolveError::not_target(page_url));
        }

        let outcome = self.resolve_page(page_url, limit).await;
        self.sessions.release();

        match &outcome {
            Ok(media) => info!(
                kind = %media.kind,
                path = %media.path.display(),
                bytes = media.bytes,
                "resolution succeeded"
            ),
            Err(error) => info!(error = %error, "resolution failed"),
        }
        outcome
    }

    /// Like [`resolve`](Self::resolve), but gives up once `deadline` elapses.
    ///
    /// On expiry the in-flight transfer is dropped, which removes its partial
    /// file, and the session is released.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DeadlineExceeded`] on expiry, otherwise the
    /// same errors as [`resolve`](Self::resolve).
    pub async fn resolve_within(
        &mut self,
        page_url: &str,
        limit: SizeLimit,
        deadline: Duration,
    ) -> Result<DownloadedMedia, ResolveError> {
        let outcome = tokio::time::timeout(deadline, self.resolve(page_url, limit)).await;
        self.sessions.release();
        outcome.unwrap_or_else(|_| {
            warn!(url = %page_url, ?deadline, "resolution deadline exceeded");
            Err(ResolveError::deadline_exceeded(page_url, deadline))
        })
    }

    async fn resolve_page(
        &mut self,
        page_url: &str,
        limit: SizeLimit,
    ) -> Result<DownloadedMedia, ResolveError> {
        let session = self
            .sessions
            .acquire()
            .map_err(|e| ResolveError::session(page_url, e))?;

        let page = session
            .get_document(page_url)
            .await
            .map_err(|e| ResolveError::page_fetch(page_url, e))?;
        if !page.is_success() {
            return Err(ResolveError::page_status(page_url, page.status));
        }

        let candidates = self.extractor.extract(&page.body, page.final_url.as_str());
        debug!(
            videos = candidates.videos().len(),
            images = candidates.images().len(),
            title = %candidates.title,
            "candidates extracted"
        );

        let (video, videos_tried) = try_candidates(
            &self.fetcher,
            session,
            candidates.videos(),
            MediaKind::Video,
            MAX_VIDEO_ATTEMPTS,
            limit,
        )
        .await;
        if let Some((fetched, url)) = video {
            return Ok(DownloadedMedia::new(
                fetched,
                MediaKind::Video,
                url,
                page_url,
                &candidates,
            ));
        }

        let (image, images_tried) = try_candidates(
            &self.fetcher,
            session,
            candidates.images(),
            MediaKind::Image,
            MAX_IMAGE_ATTEMPTS,
            limit,
        )
        .await;
        if let Some((fetched, url)) = image {
            return Ok(DownloadedMedia::new(
                fetched,
                MediaKind::Image,
                url,
                page_url,
                &candidates,
            ));
        }

        Err(ResolveError::no_media(page_url, videos_tried, images_tried))
    }
}

/// Tries up to `cap` candidates in order; returns the first success and the attempt count.
async fn try_candidates<'a>(
    fetcher: &BoundedFetcher,
    session: &Session,
    urls: &'a [String],
    kind: MediaKind,
    cap: usize,
    limit: SizeLimit,
) -> (Option<(FetchedFile, &'a str)>, usize) {
    let mut attempts = 0;
    for url in urls.iter().take(cap) {
        attempts += 1;
        match fetcher.fetch(session, url, kind, limit).await {
            Ok(fetched) => return (Some((fetched, url.as_str())), attempts),
            Err(error) => warn!(
                candidate = %url,
                kind = %kind,
                attempt = attempts,
                error = %error,
                "candidate fetch failed; trying next"
            ),
        }
    }
    if urls.len() > cap {
        debug!(kind = %kind, skipped = urls.len() - cap, "attempt cap reached");
    }
    (None, attempts)
}
