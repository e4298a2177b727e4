//! JSON-LD (`application/ld+json`) structured data.
//!
//! Each block is parsed into a `serde_json::Value` tree and walked depth
//! first. String values under media-bearing keys are classified by their path
//! extension.

use serde_json::Value;
use tracing::debug;

use super::{ExtractionStrategy, MediaCandidateSet, PageContext, StrategyError, selector};
use crate::media::MediaKind;

const LD_JSON_TYPE: &str = "application/ld+json";

/// Keys whose string values may point at media.
const MEDIA_KEYS: &[&str] = &["contentUrl", "url", "image", "video"];

/// Collects media URLs from JSON-LD blocks; malformed blocks are skipped one by one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedDataStrategy;

impl ExtractionStrategy for LinkedDataStrategy {
    fn name(&self) -> &'static str {
        "linked-data"
    }

    fn collect(
        &self,
        page: &PageContext<'_>,
        candidates: &mut MediaCandidateSet,
    ) -> Result<(), StrategyError> {
        let scripts = selector("script[type]")?;

        let blocks = page.document().select(&scripts).filter(|script| {
            script
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(LD_JSON_TYPE))
        });

        for (index, script) in blocks.enumerate() {
            let text: String = script.text().collect();
            match serde_json::from_str::<Value>(text.trim()) {
                Ok(tree) => walk(&tree, page, candidates),
                Err(source) => {
                    let error = StrategyError::MalformedJson { index, source };
                    debug!(error = %error, "skipping structured data block");
                }
            }
        }
        Ok(())
    }
}

fn walk(node: &Value, page: &PageContext<'_>, candidates: &mut MediaCandidateSet) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                if let Value::String(raw) = child
                    && MEDIA_KEYS.contains(&key.as_str())
                {
                    add_classified(raw, page, candidates);
                } else {
                    walk(child, page, candidates);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, page, candidates);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn add_classified(raw: &str, page: &PageContext<'_>, candidates: &mut MediaCandidateSet) {
    let Some(url) = page.resolve(raw) else {
        return;
    };
    if let Some(kind) = MediaKind::classify(&url) {
        candidates.insert(kind, url);
    }
}
