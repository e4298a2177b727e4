//! Session client construction policy.
//!
//! Every session client carries the browser identity headers, the configured
//! timeouts, a per-session cookie jar, relaxed certificate validation and,
//! when configured, one upstream proxy.

use rand::seq::SliceRandom;
use reqwest::{Client, ClientBuilder, Proxy};
use tracing::debug;

use super::{SessionConfig, SessionError};
use crate::user_agent::{BROWSER_USER_AGENT, browser_headers};

/// Builds the `reqwest` client backing one session.
pub(super) fn build_session_client(config: &SessionConfig) -> Result<Client, SessionError> {
    let mut builder = base_builder(config);

    if let Some(endpoint) = choose_proxy(&config.proxies) {
        let proxy = Proxy::all(endpoint).map_err(|source| SessionError::InvalidProxy {
            proxy: endpoint.to_string(),
            source,
        })?;
        debug!(proxy = %endpoint, "routing session through upstream proxy");
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|source| SessionError::Build { source })
}

fn base_builder(config: &SessionConfig) -> ClientBuilder {
    // Pinterest CDN edges intermittently present certificates for sibling hosts.
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(browser_headers())
        .danger_accept_invalid_certs(true)
        .cookie_store(true)
        .gzip(true)
}

/// Picks one proxy endpoint at random; `None` when the list is empty.
fn choose_proxy(proxies: &[String]) -> Option<&str> {
    proxies
        .choose(&mut rand::thread_rng())
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
}
