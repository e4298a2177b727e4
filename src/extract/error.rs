//! Errors raised inside a single extraction strategy.
//!
//! These never leave the extractor: a failing strategy is logged and skipped
//! and the remaining strategies still run.

use thiserror::Error;

/// Failure of one extraction strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// A CSS selector could not be compiled.
    #[error("invalid selector '{selector}': {reason}")]
    Selector {
        /// The selector text.
        selector: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// A structured-data block was not valid JSON.
    #[error("malformed structured data block #{index}: {source}")]
    MalformedJson {
        /// Position of the block among the page's structured-data scripts.
        index: usize,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
