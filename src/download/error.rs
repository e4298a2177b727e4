//! Error types for bounded candidate transfers.
//!
//! Every variant is fatal to the candidate being fetched but not to the
//! resolution; the resolver logs it and moves on to the next candidate.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur while fetching one candidate.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server-declared size is over the ceiling; nothing was written.
    #[error("file too large: {url} reports {reported} bytes (limit {limit} bytes)")]
    TooLarge {
        /// The candidate URL.
        url: String,
        /// Content-Length reported by the server.
        reported: u64,
        /// The ceiling in bytes.
        limit: u64,
    },

    /// The streamed body grew past the ceiling; the partial file was deleted.
    #[error("exceeded maximum size of {limit} bytes downloading {url} (received at least {received} bytes)")]
    ExceededLimit {
        /// The candidate URL.
        url: String,
        /// Bytes received when the transfer was aborted.
        received: u64,
        /// The ceiling in bytes.
        limit: u64,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server answered successfully but sent no bytes.
    #[error("empty response body downloading {url}")]
    EmptyBody {
        /// The candidate URL.
        url: String,
    },

    /// The candidate URL is malformed or not http(s).
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The session client could not be built.
    #[error("session unavailable: {source}")]
    Session {
        /// The underlying session error.
        #[source]
        source: SessionError,
    },
}

impl FetchError {
    /// Creates a pre-flight oversize error.
    pub fn too_large(url: impl Into<String>, reported: u64, limit: u64) -> Self {
        Self::TooLarge {
            url: url.into(),
            reported,
            limit,
        }
    }

    /// Creates a mid-stream oversize error.
    pub fn exceeded_limit(url: impl Into<String>, received: u64, limit: u64) -> Self {
        Self::ExceededLimit {
            url: url.into(),
            received,
            limit,
        }
    }

    /// Creates a network or timeout error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns true for either oversize variant.
    #[must_use]
    pub fn is_oversize(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::ExceededLimit { .. })
    }
}

impl From<SessionError> for FetchError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Timeout { url } => Self::Timeout { url },
            SessionError::Network { url, source } => Self::Network { url, source },
            SessionError::HttpStatus { url, status } => Self::HttpStatus { url, status },
            other @ (SessionError::InvalidProxy { .. } | SessionError::Build { .. }) => {
                Self::Session { source: other }
            }
        }
    }
}
