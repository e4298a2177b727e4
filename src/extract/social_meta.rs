//! Open Graph and Twitter Card `<meta>` tags.

use super::{
    ExtractionStrategy, MediaCandidateSet, PageContext, StrategyError, first_attr, selector,
};
use crate::media::MediaKind;

/// Meta keys whose content is a video URL.
pub const VIDEO_META_KEYS: &[&str] = &[
    "og:video",
    "og:video:url",
    "og:video:secure_url",
    "twitter:player:stream",
];

/// Meta keys whose content is an image URL.
pub const IMAGE_META_KEYS: &[&str] = &[
    "og:image",
    "og:image:url",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

/// Collects media URLs from `<meta property|name=... content=...>` tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocialMetaStrategy;

impl ExtractionStrategy for SocialMetaStrategy {
    fn name(&self) -> &'static str {
        "social-meta"
    }

    fn collect(
        &self,
        page: &PageContext<'_>,
        candidates: &mut MediaCandidateSet,
    ) -> Result<(), StrategyError> {
        let metas = selector("meta[content]")?;

        for meta in page.document().select(&metas) {
            let Some(key) = first_attr(&meta, &["property", "name"]) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            let kind = if VIDEO_META_KEYS.contains(&key.as_str()) {
                MediaKind::Video
            } else if IMAGE_META_KEYS.contains(&key.as_str()) {
                MediaKind::Image
            } else {
                continue;
            };
            if let Some(url) = first_attr(&meta, &["content"]).and_then(|c| page.resolve(c)) {
                candidates.insert(kind, url);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scraper::Html;
    use url::Url;

    fn run(html: &str) -> MediaCandidateSet {
        let document = Html::parse_document(html);
        let base = Url::parse("https://www.pinterest.com/pin/9/").unwrap();
        let mut set = MediaCandidateSet::default();
        SocialMetaStrategy
            .collect(&PageContext::new(&document, Some(&base)), &mut set)
            .unwrap();
        set
    }

    #[test]
    fn test_video_and_image_keys_are_split() {
        let set = run(r#"<head>
            <meta property="og:video:secure_url" content="https://v.pinimg.com/a.mp4">
            <meta property="og:image" content="https://i.pinimg.com/736x/a.jpg">
            <meta name="twitter:image" content="/static/b.png">
            <meta property="og:title" content="not media">
            </head>"#);
        assert_eq!(set.videos(), ["https://v.pinimg.com/a.mp4"]);
        assert_eq!(
            set.images(),
            [
                "https://i.pinimg.com/736x/a.jpg",
                "https://www.pinterest.com/static/b.png",
            ]
        );
    }

    #[test]
    fn test_meta_keys_are_case_insensitive() {
        let set = run(r#"<meta property="OG:IMAGE" content="https://i.pinimg.com/a.jpg">"#);
        assert_eq!(set.images(), ["https://i.pinimg.com/a.jpg"]);
    }

    #[test]
    fn test_repeated_meta_values_deduplicated() {
        let set = run(r#"
            <meta property="og:image" content="https://i.pinimg.com/a.jpg">
            <meta property="og:image:secure_url" content="https://i.pinimg.com/a.jpg">
            <meta name="twitter:image:src" content="https://i.pinimg.com/a.jpg">"#);
        assert_eq!(set.images().len(), 1);
    }
}
