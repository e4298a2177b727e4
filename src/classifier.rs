//! Pinterest URL classification.
//!
//! Decides whether a user-supplied string points into the Pinterest domain
//! family before any network traffic is spent on it.

use url::Url;

/// Registrable domains served by Pinterest, including country-code variants
/// and the `pin.it` short-link domain.
pub const PINTEREST_DOMAINS: &[&str] = &[
    "pinterest.com",
    "pinterest.ru",
    "pinterest.co.uk",
    "pinterest.de",
    "pinterest.fr",
    "pinterest.ca",
    "pinterest.com.au",
    "pinterest.es",
    "pinterest.it",
    "pinterest.jp",
    "pinterest.com.mx",
    "pinterest.ch",
    "pinterest.at",
    "pinterest.nz",
    "pinterest.ie",
    "pinterest.pt",
    "pinterest.se",
    "pinterest.dk",
    "pinterest.cl",
    "pinterest.co.kr",
    "pinterest.ph",
    "pin.it",
];

/// Normalizes a host string: trim, lowercase, strip trailing '.' and a leading "www.".
#[must_use]
pub fn canonical_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// Returns true if `host` equals `domain` or is a subdomain of it.
#[must_use]
pub fn host_in_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Returns true if `url` belongs to the Pinterest domain family.
///
/// Never fails: unparsable input simply is not a target.
#[must_use]
pub fn is_target_url(url: &str) -> bool {
    UrlClassifier::default().is_target(url)
}

/// Domain-family membership check with an extendable host list.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    domains: Vec<String>,
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self {
            domains: PINTEREST_DOMAINS.iter().map(|d| (*d).to_string()).collect(),
        }
    }
}

impl UrlClassifier {
    /// Creates a classifier for the default Pinterest domain family.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts additional hosts (e.g. a self-hosted mirror or a local test server).
    #[must_use]
    pub fn with_additional_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.domains
            .extend(hosts.into_iter().map(|h| canonical_host(h.as_ref())));
        self
    }

    /// Returns true if `url` is an http(s) URL whose host is in the accepted family.
    #[must_use]
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn is_target(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = canonical_host(host);
        self.domains
            .iter()
            .any(|domain| host_in_domain(&host, domain))
    }
}
