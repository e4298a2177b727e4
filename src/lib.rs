//! Pinfetch Core Library
//!
//! Resolves a Pinterest pin URL into a single downloaded media file, with a
//! strict byte ceiling on every transfer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`classifier`] - Recognizes Pinterest URLs before any network I/O
//! - [`session`] - HTTP session lifecycle (timeouts, proxies, browser headers)
//! - [`extract`] - Media candidate discovery over page HTML
//! - [`download`] - Size-bounded streaming transfer to local files
//! - [`resolver`] - The resolve-and-fetch pipeline tying it together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod config;
pub mod download;
pub mod extract;
pub mod media;
pub mod resolver;
pub mod session;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use classifier::{PINTEREST_DOMAINS, UrlClassifier, is_target_url};
pub use config::ResolverConfig;
pub use download::{BoundedFetcher, FetchError, FetchedFile, SizeLimit};
pub use extract::{MediaCandidateSet, MediaExtractor, extract};
pub use media::MediaKind;
pub use resolver::{
    DownloadedMedia, MAX_IMAGE_ATTEMPTS, MAX_VIDEO_ATTEMPTS, MediaResolver, ResolveError,
};
pub use session::{Session, SessionConfig, SessionError, SessionManager};
