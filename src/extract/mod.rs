//! Media candidate extraction from pin page HTML.
//!
//! Pin markup is not stable, so candidates are collected by four independent
//! strategies applied in a fixed order into one accumulating
//! [`MediaCandidateSet`]:
//!
//! 1. [`InlineMediaStrategy`] - `<video src>` and nested `<source src>`
//! 2. [`SocialMetaStrategy`] - Open Graph / Twitter Card `<meta>` tags
//! 3. [`LinkedDataStrategy`] - JSON-LD blocks walked recursively
//! 4. [`CdnImageStrategy`] - `<img>` elements served from the media CDN
//!
//! A strategy that fails is logged and skipped; extraction itself never fails.
//! All parsing uses CSS selectors via the `scraper` crate.

mod cdn;
mod error;
mod inline;
mod linked_data;
mod social_meta;

pub use cdn::{CdnImageStrategy, DEFAULT_CDN_HOSTS};
pub use error::StrategyError;
pub use inline::InlineMediaStrategy;
pub use linked_data::LinkedDataStrategy;
pub use social_meta::{IMAGE_META_KEYS, SocialMetaStrategy, VIDEO_META_KEYS};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, trace};
use url::Url;

use crate::media::MediaKind;

/// Candidate media URLs and descriptive metadata found on one page.
///
/// Both URL lists are duplicate-free and keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCandidateSet {
    videos: Vec<String>,
    images: Vec<String>,
    /// Page title (Open Graph title, else `<title>`), empty when absent.
    pub title: String,
    /// Page description (Open Graph description, else meta description), empty when absent.
    pub description: String,
}

impl MediaCandidateSet {
    /// Video candidates in discovery order.
    #[must_use]
    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    /// Image candidates in discovery order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Adds `url` to the list for `kind`; returns false if it was already present.
    pub fn insert(&mut self, kind: MediaKind, url: String) -> bool {
        let list = match kind {
            MediaKind::Video => &mut self.videos,
            MediaKind::Image => &mut self.images,
        };
        if list.contains(&url) {
            return false;
        }
        list.push(url);
        true
    }

    /// Returns true when neither videos nor images were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.images.is_empty()
    }
}

/// Parsed page plus the base URL relative media references resolve against.
pub struct PageContext<'a> {
    document: &'a Html,
    base_url: Option<&'a Url>,
}

impl<'a> PageContext<'a> {
    /// Wraps a parsed document. `base_url` is `None` when the page URL is unusable,
    /// in which case only absolute references are kept.
    #[must_use]
    pub fn new(document: &'a Html, base_url: Option<&'a Url>) -> Self {
        Self { document, base_url }
    }

    /// The parsed document.
    #[must_use]
    pub fn document(&self) -> &'a Html {
        self.document
    }

    /// Resolves a raw attribute value to an absolute http(s) URL.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<String> {
        resolve_media_url(raw, self.base_url)
    }
}

/// Resolves `raw` against `base_url`.
///
/// Protocol-relative values take the base's scheme, or `https:` without a
/// base. Empty values and anything that does not end up as http(s) (`data:`,
/// `blob:`, `javascript:`) are dropped.
#[must_use]
pub fn resolve_media_url(raw: &str, base_url: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let resolved = if let Some(rest) = raw.strip_prefix("//") {
        match base_url {
            Some(base) => base.join(raw).ok()?,
            None => Url::parse(&format!("https://{rest}")).ok()?,
        }
    } else {
        match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => base_url?.join(raw).ok()?,
            Err(_) => return None,
        }
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// One way of finding media candidates in a page.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Adds whatever this strategy finds to `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] when the strategy cannot run; the extractor
    /// logs it and moves on.
    fn collect(
        &self,
        page: &PageContext<'_>,
        candidates: &mut MediaCandidateSet,
    ) -> Result<(), StrategyError>;
}

/// Compiles a CSS selector, reporting failures as [`StrategyError::Selector`].
pub(crate) fn selector(css: &'static str) -> Result<Selector, StrategyError> {
    Selector::parse(css).map_err(|e| StrategyError::Selector {
        selector: css,
        reason: e.to_string(),
    })
}

/// Returns the trimmed value of the first attribute of `element` that is present and non-empty.
pub(crate) fn first_attr<'a>(element: &ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Runs the extraction strategies in their fixed order.
pub struct MediaExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for MediaExtractor {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(InlineMediaStrategy),
            Box::new(SocialMetaStrategy),
            Box::new(LinkedDataStrategy),
            Box::new(CdnImageStrategy::default()),
        ])
    }
}

impl std::fmt::Debug for MediaExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("MediaExtractor")
            .field("strategies", &names)
            .finish()
    }
}

impl MediaExtractor {
    /// Creates the standard four-strategy extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with an explicit strategy order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Standard extractor whose CDN fallback accepts `hosts` instead of the defaults.
    #[must_use]
    pub fn with_cdn_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_strategies(vec![
            Box::new(InlineMediaStrategy),
            Box::new(SocialMetaStrategy),
            Box::new(LinkedDataStrategy),
            Box::new(CdnImageStrategy::new(hosts)),
        ])
    }

    /// Extracts candidates and metadata from `html`, resolving against `base_url`.
    #[must_use]
    #[instrument(skip(self, html), fields(base_url = %base_url, html_bytes = html.len()))]
    pub fn extract(&self, html: &str, base_url: &str) -> MediaCandidateSet {
        let document = Html::parse_document(html);
        let base = Url::parse(base_url).ok();
        if base.is_none() {
            debug!("base URL unparsable; relative media references will be dropped");
        }
        let page = PageContext::new(&document, base.as_ref());

        let mut candidates = MediaCandidateSet::default();
        read_metadata(&page, &mut candidates);

        for strategy in &self.strategies {
            let before = (candidates.videos.len(), candidates.images.len());
            match strategy.collect(&page, &mut candidates) {
                Ok(()) => trace!(
                    strategy = strategy.name(),
                    videos = candidates.videos.len() - before.0,
                    images = candidates.images.len() - before.1,
                    "strategy finished"
                ),
                Err(error) => debug!(
                    strategy = strategy.name(),
                    error = %error,
                    "strategy failed; continuing with remaining strategies"
                ),
            }
        }

        debug!(
            videos = candidates.videos.len(),
            images = candidates.images.len(),
            "extraction complete"
        );
        candidates
    }
}

/// Extracts candidates from `html` with the standard strategies.
#[must_use]
pub fn extract(html: &str, base_url: &str) -> MediaCandidateSet {
    MediaExtractor::default().extract(html, base_url)
}

fn read_metadata(page: &PageContext<'_>, candidates: &mut MediaCandidateSet) {
    let metas = match selector("meta") {
        Ok(sel) => sel,
        Err(error) => {
            debug!(error = %error, "metadata selector failed");
            return;
        }
    };

    let mut og_title = None;
    let mut og_description = None;
    let mut meta_description = None;
    for element in page.document().select(&metas) {
        let Some(content) = first_attr(&element, &["content"]) else {
            continue;
        };
        let key = first_attr(&element, &["property", "name"]).map(str::to_ascii_lowercase);
        match key.as_deref() {
            Some("og:title") => {
                og_title.get_or_insert(content);
            }
            Some("og:description") => {
                og_description.get_or_insert(content);
            }
            Some("description") => {
                meta_description.get_or_insert(content);
            }
            _ => {}
        }
    }

    let page_title = selector("title").ok().and_then(|sel| {
        page.document()
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    });

    candidates.title = og_title
        .map(str::to_string)
        .or(page_title)
        .unwrap_or_default();
    candidates.description = og_description
        .or(meta_description)
        .map(str::to_string)
        .unwrap_or_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.pinterest.com/pin/123/";

    #[test]
    fn test_resolve_media_url_variants() {
        let base = Url::parse(BASE).ok();
        let base = base.as_ref();
        assert_eq!(
            resolve_media_url("https://v.pinimg.com/a.mp4", base).as_deref(),
            Some("https://v.pinimg.com/a.mp4")
        );
        assert_eq!(
            resolve_media_url("//i.pinimg.com/a.jpg", base).as_deref(),
            Some("https://i.pinimg.com/a.jpg")
        );
        assert_eq!(
            resolve_media_url("/media/a.jpg", base).as_deref(),
            Some("https://www.pinterest.com/media/a.jpg")
        );
        assert_eq!(
            resolve_media_url("clip.mp4", base).as_deref(),
            Some("https://www.pinterest.com/pin/123/clip.mp4")
        );
        assert_eq!(resolve_media_url("  ", base), None);
        assert_eq!(resolve_media_url("data:image/png;base64,AAAA", base), None);
        assert_eq!(resolve_media_url("blob:https://x/1", base), None);
    }

    #[test]
    fn test_protocol_relative_follows_base_scheme() {
        let http_base = Url::parse("http://www.pinterest.com/pin/9/").ok();
        assert_eq!(
            resolve_media_url("//i.pinimg.com/a.jpg", http_base.as_ref()).as_deref(),
            Some("http://i.pinimg.com/a.jpg")
        );
        assert_eq!(
            resolve_media_url("//i.pinimg.com/a.jpg", None).as_deref(),
            Some("https://i.pinimg.com/a.jpg")
        );
    }

    #[test]
    fn test_resolve_media_url_without_base_keeps_absolute_only() {
        assert_eq!(resolve_media_url("/media/a.jpg", None), None);
        assert!(resolve_media_url("https://i.pinimg.com/a.jpg", None).is_some());
    }

    #[test]
    fn test_candidate_set_insert_deduplicates_in_order() {
        let mut set = MediaCandidateSet::default();
        assert!(set.insert(MediaKind::Image, "https://a/1.jpg".into()));
        assert!(set.insert(MediaKind::Image, "https://a/2.jpg".into()));
        assert!(!set.insert(MediaKind::Image, "https://a/1.jpg".into()));
        assert!(set.insert(MediaKind::Video, "https://a/1.jpg".into()));
        assert_eq!(set.images(), ["https://a/1.jpg", "https://a/2.jpg"]);
        assert_eq!(set.videos(), ["https://a/1.jpg"]);
    }

    #[test]
    fn test_inline_video_also_in_meta_appears_once() {
        let html = r#"<html><head>
            <meta property="og:video" content="https://v.pinimg.com/videos/clip.mp4">
            </head><body>
            <video src="https://v.pinimg.com/videos/clip.mp4"></video>
            </body></html>"#;
        let set = extract(html, BASE);
        assert_eq!(set.videos(), ["https://v.pinimg.com/videos/clip.mp4"]);
    }

    #[test]
    fn test_strategies_contribute_in_fixed_order() {
        let html = r#"<html><head>
            <meta property="og:video" content="https://v.pinimg.com/meta.mp4">
            <script type="application/ld+json">{"contentUrl": "https://v.pinimg.com/ld.mp4"}</script>
            </head><body>
            <video><source src="/inline.mp4"></video>
            </body></html>"#;
        let set = extract(html, BASE);
        assert_eq!(
            set.videos(),
            [
                "https://www.pinterest.com/inline.mp4",
                "https://v.pinimg.com/meta.mp4",
                "https://v.pinimg.com/ld.mp4",
            ]
        );
    }

    #[test]
    fn test_metadata_prefers_open_graph() {
        let html = r#"<html><head><title> Page title </title>
            <meta property="og:title" content="Pin title">
            <meta name="description" content="plain description">
            <meta property="og:description" content="og description">
            </head></html>"#;
        let set = extract(html, BASE);
        assert_eq!(set.title, "Pin title");
        assert_eq!(set.description, "og description");
    }

    #[test]
    fn test_metadata_falls_back_to_title_and_meta_description() {
        let html = r#"<html><head><title> Page title </title>
            <meta name="description" content="plain description">
            </head></html>"#;
        let set = extract(html, BASE);
        assert_eq!(set.title, "Page title");
        assert_eq!(set.description, "plain description");
    }

    #[test]
    fn test_extract_non_html_input_is_empty() {
        let set = extract("\u{0}\u{1}not html at all", BASE);
        assert!(set.is_empty());
        assert!(set.title.is_empty());
    }

    struct FailingStrategy;

    impl ExtractionStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn collect(
            &self,
            _page: &PageContext<'_>,
            _candidates: &mut MediaCandidateSet,
        ) -> Result<(), StrategyError> {
            Err(StrategyError::Selector {
                selector: "video[",
                reason: "unterminated attribute selector".to_string(),
            })
        }
    }

    #[test]
    fn test_failing_strategy_does_not_stop_extraction() {
        let extractor = MediaExtractor::with_strategies(vec![
            Box::new(FailingStrategy),
            Box::new(SocialMetaStrategy),
        ]);
        let html = r#"<meta property="og:image" content="https://i.pinimg.com/originals/a.jpg">"#;
        let set = extractor.extract(html, BASE);
        assert_eq!(set.images(), ["https://i.pinimg.com/originals/a.jpg"]);
    }
}
