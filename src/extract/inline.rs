//! Inline `<video>` elements and their nested `<source>` alternates.

use super::{
    ExtractionStrategy, MediaCandidateSet, PageContext, StrategyError, first_attr, selector,
};
use crate::media::MediaKind;

/// Collects `<video src>` and nested `<source src>` values as video candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMediaStrategy;

impl ExtractionStrategy for InlineMediaStrategy {
    fn name(&self) -> &'static str {
        "inline-media"
    }

    fn collect(
        &self,
        page: &PageContext<'_>,
        candidates: &mut MediaCandidateSet,
    ) -> Result<(), StrategyError> {
        let videos = selector("video")?;
        let sources = selector("source")?;

        for video in page.document().select(&videos) {
            if let Some(url) = first_attr(&video, &["src"]).and_then(|src| page.resolve(src)) {
                candidates.insert(MediaKind::Video, url);
            }
            for source in video.select(&sources) {
                if let Some(url) = first_attr(&source, &["src"]).and_then(|src| page.resolve(src)) {
                    candidates.insert(MediaKind::Video, url);
                }
            }
        }
        Ok(())
    }
}
