//! Resolver configuration.
//!
//! All limits and network settings are explicit values handed to the
//! resolver at construction; nothing here is process-global.

use std::path::PathBuf;
use std::time::Duration;

use crate::session::SessionConfig;

/// Subdirectory of the system temp dir used when no output dir is configured.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "pinfetch";

/// Settings for one [`MediaResolver`](crate::resolver::MediaResolver).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Network settings for the resolver's session.
    pub session: SessionConfig,
    /// Directory fetched media is written to.
    pub output_dir: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            output_dir: std::env::temp_dir().join(DEFAULT_OUTPUT_SUBDIR),
        }
    }
}

impl ResolverConfig {
    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replaces the session settings.
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Sets the total request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.session.request_timeout = timeout;
        self
    }

    /// Sets the upstream proxy endpoints.
    #[must_use]
    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session = self.session.with_proxies(proxies);
        self
    }
}
