//! Error types for resolver operations.
//!
//! These are the only failures surfaced to the caller; their `Display` text is
//! the user-facing failure message.

use std::time::Duration;

use thiserror::Error;

use crate::session::SessionError;

/// Errors that end a resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input is not a Pinterest URL; no network I/O was performed.
    #[error("not a Pinterest link: '{url}'\n  Suggestion: Send a pinterest.com or pin.it pin URL")]
    NotTargetUrl {
        /// The rejected input.
        url: String,
    },

    /// The session client could not be built.
    #[error("could not open HTTP session for '{url}': {source}")]
    Session {
        /// The page URL being resolved.
        url: String,
        /// The underlying session error.
        #[source]
        source: SessionError,
    },

    /// The page could not be fetched at the transport level.
    #[error("could not load page '{url}': {source}")]
    PageFetch {
        /// The page URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: SessionError,
    },

    /// The page answered with a non-success status.
    #[error("page '{url}' returned HTTP {status}")]
    PageStatus {
        /// The page URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Every candidate failed, or none existed.
    #[error(
        "no retrievable media found at '{url}' (tried {videos_tried} video(s), {images_tried} image(s))"
    )]
    NoMediaFound {
        /// The page URL.
        url: String,
        /// Video candidates attempted.
        videos_tried: usize,
        /// Image candidates attempted.
        images_tried: usize,
    },

    /// The caller's overall deadline expired before the resolution finished.
    #[error("resolving '{url}' did not finish within {deadline:?}")]
    DeadlineExceeded {
        /// The page URL.
        url: String,
        /// The deadline that expired.
        deadline: Duration,
    },
}

impl ResolveError {
    /// Creates a `NotTargetUrl` error.
    #[must_use]
    pub fn not_target(url: &str) -> Self {
        Self::NotTargetUrl {
            url: url.to_string(),
        }
    }

    /// Creates a `Session` error.
    #[must_use]
    pub fn session(url: &str, source: SessionError) -> Self {
        Self::Session {
            url: url.to_string(),
            source,
        }
    }

    /// Creates a `PageFetch` error.
    #[must_use]
    pub fn page_fetch(url: &str, source: SessionError) -> Self {
        Self::PageFetch {
            url: url.to_string(),
            source,
        }
    }

    /// Creates a `PageStatus` error.
    #[must_use]
    pub fn page_status(url: &str, status: u16) -> Self {
        Self::PageStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `NoMediaFound` error.
    #[must_use]
    pub fn no_media(url: &str, videos_tried: usize, images_tried: usize) -> Self {
        Self::NoMediaFound {
            url: url.to_string(),
            videos_tried,
            images_tried,
        }
    }

    /// Creates a `DeadlineExceeded` error.
    #[must_use]
    pub fn deadline_exceeded(url: &str, deadline: Duration) -> Self {
        Self::DeadlineExceeded {
            url: url.to_string(),
            deadline,
        }
    }

    /// Returns true when the input was rejected before any network I/O.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NotTargetUrl { .. })
    }

    /// Returns true for the "nothing retrievable" outcome, as opposed to a hard error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoMediaFound { .. })
    }
}
