//! Media kinds and the file-extension tables used to classify candidate URLs.

use std::fmt;

use serde::Serialize;
use url::Url;

/// Path extensions recognized as video payloads.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".m4v", ".mov", ".webm", ".mkv"];

/// Path extensions recognized as image payloads.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// The kind of media a candidate URL is expected to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A video file.
    Video,
    /// A still image.
    Image,
}

impl MediaKind {
    /// Lowercase label used in file names and messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }

    /// Extension used when the candidate URL does not carry a known one.
    #[must_use]
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Image => "jpg",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Video => VIDEO_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
        }
    }

    /// Returns the known extension (without the dot) that `url` ends with for this kind.
    #[must_use]
    pub fn extension_of(self, url: &str) -> Option<&'static str> {
        let path = url_path_lowercase(url);
        self.extensions()
            .iter()
            .find(|ext| path.ends_with(*ext))
            .map(|ext| ext.trim_start_matches('.'))
    }

    /// Classifies a URL by its path extension, videos taking precedence.
    #[must_use]
    pub fn classify(url: &str) -> Option<Self> {
        if Self::Video.extension_of(url).is_some() {
            Some(Self::Video)
        } else if Self::Image.extension_of(url).is_some() {
            Some(Self::Image)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased URL path; falls back to the raw string minus query and fragment
/// when the value does not parse as an absolute URL.
fn url_path_lowercase(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
    }
}
