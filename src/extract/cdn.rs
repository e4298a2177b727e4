//! Media CDN image fallback.
//!
//! Pin pages rendered client side can carry no usable video, meta or JSON-LD
//! markup at all; the `<img>` elements pointing at the media CDN are then the
//! only candidates left.

use url::Url;

use super::{
    ExtractionStrategy, MediaCandidateSet, PageContext, StrategyError, first_attr, selector,
};
use crate::classifier::{canonical_host, host_in_domain};
use crate::media::MediaKind;

/// Hosts of the Pinterest media CDN (subdomains included).
pub const DEFAULT_CDN_HOSTS: &[&str] = &["pinimg.com"];

/// Collects `<img src>` values that are images served from the media CDN.
#[derive(Debug, Clone)]
pub struct CdnImageStrategy {
    hosts: Vec<String>,
}

impl Default for CdnImageStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_HOSTS)
    }
}

impl CdnImageStrategy {
    /// Creates the strategy for an explicit CDN host list.
    #[must_use]
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| canonical_host(h.as_ref()))
                .collect(),
        }
    }

    fn is_cdn_image(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(canonical_host))
        else {
            return false;
        };
        MediaKind::Image.extension_of(url).is_some()
            && self.hosts.iter().any(|cdn| host_in_domain(&host, cdn))
    }
}

impl ExtractionStrategy for CdnImageStrategy {
    fn name(&self) -> &'static str {
        "cdn-image"
    }

    fn collect(
        &self,
        page: &PageContext<'_>,
        candidates: &mut MediaCandidateSet,
    ) -> Result<(), StrategyError> {
        let images = selector("img")?;

        for img in page.document().select(&images) {
            let Some(url) = first_attr(&img, &["src"]).and_then(|src| page.resolve(src)) else {
                continue;
            };
            if self.is_cdn_image(&url) {
                candidates.insert(MediaKind::Image, url);
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

    fn run(strategy: &CdnImageStrategy, html: &str) -> MediaCandidateSet {
        let document = Html::parse_document(html);
        let base = Url::parse("https://www.pinterest.com/pin/9/").unwrap();
        let mut set = MediaCandidateSet::default();
        strategy
            .collect(&PageContext::new(&document, Some(&base)), &mut set)
            .unwrap();
        set
    }

    #[test]
    fn test_only_cdn_hosted_images_collected() {
        let set = run(
            &CdnImageStrategy::default(),
            r#"<body>
            <img src="https://i.pinimg.com/originals/aa/bb/cc.jpg">
            <img src="//s.pinimg.com/webapp/logo.png">
            <img src="https://example.com/other.jpg">
            <img src="https://i.pinimg.com/avatars/user.svg">
            <img src="/relative/on-pinterest.jpg">
            </body>"#,
        );
        assert_eq!(
            set.images(),
            [
                "https://i.pinimg.com/originals/aa/bb/cc.jpg",
                "https://s.pinimg.com/webapp/logo.png",
            ]
        );
    }

    #[test]
    fn test_lookalike_cdn_host_rejected() {
        let set = run(
            &CdnImageStrategy::default(),
            r#"<img src="https://evilpinimg.com/a.jpg">"#,
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_custom_cdn_hosts() {
        let strategy = CdnImageStrategy::new(["media.example.org"]);
        let set = run(
            &strategy,
            r#"<img src="https://media.example.org/a.png"><img src="https://i.pinimg.com/a.jpg">"#,
        );
        assert_eq!(set.images(), ["https://media.example.org/a.png"]);
    }
}
