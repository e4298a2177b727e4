//! HTTP session management.
//!
//! A [`SessionManager`] owns at most one [`Session`], a `reqwest` client with
//! browser identity headers and bounded timeouts. The session is created on
//! first use and released explicitly once a resolution finishes.
//!
//! # Example
//!
//! ```no_run
//! use pinfetch_core::session::{SessionConfig, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sessions = SessionManager::new(SessionConfig::default());
//! let page = sessions.acquire()?.get_document("https://www.pinterest.com/pin/1/").await?;
//! println!("HTTP {} from {}", page.status, page.final_url);
//! sessions.release();
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use error::SessionError;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::{debug, instrument};
use url::Url;

/// Default total request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Network settings applied to every session client.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound for each individual request, body included.
    pub request_timeout: Duration,
    /// Upper bound for establishing a connection.
    pub connect_timeout: Duration,
    /// Upstream proxy endpoints; one is picked per session when non-empty.
    pub proxies: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            proxies: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Sets the total request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Replaces the proxy endpoint list.
    #[must_use]
    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = proxies
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        self
    }
}

/// A fetched HTML document.
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// HTTP status code of the final response.
    pub status: u16,
    /// URL after redirects; used as the base for relative media URLs.
    pub final_url: Url,
    /// Decoded body text (empty for non-success responses).
    pub body: String,
}

impl PageDocument {
    /// Returns true for 2xx responses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An open HTTP session.
#[derive(Debug)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Builds a new session from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when a proxy endpoint is invalid or the client
    /// cannot be constructed.
    pub fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        Ok(Self {
            client: client::build_session_client(config)?,
        })
    }

    /// GETs an HTML document, following redirects.
    ///
    /// Non-success statuses are returned in [`PageDocument::status`] rather than
    /// as errors so callers can report them.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Timeout`] or [`SessionError::Network`] on transport failure.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_document(&self, url: &str) -> Result<PageDocument, SessionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SessionError::from_request(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();
        let body = if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| SessionError::from_request(url, e))?
        } else {
            String::new()
        };
        debug!(
            status = status.as_u16(),
            final_url = %final_url,
            bytes = body.len(),
            "fetched document"
        );

        Ok(PageDocument {
            status: status.as_u16(),
            final_url,
            body,
        })
    }

    /// Issues a HEAD request and returns the response headers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on transport failure or a non-success status.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn head(&self, url: &str) -> Result<HeaderMap, SessionError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| SessionError::from_request(url, e))?;
        if !response.status().is_success() {
            return Err(SessionError::http_status(url, response.status().as_u16()));
        }
        Ok(response.headers().clone())
    }

    /// Opens a streaming GET; the body is read incrementally by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on transport failure or a non-success status.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn get_stream(&self, url: &str) -> Result<reqwest::Response, SessionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SessionError::from_request(url, e))?;
        if !response.status().is_success() {
            return Err(SessionError::http_status(url, response.status().as_u16()));
        }
        Ok(response)
    }
}

/// Lazily creates and explicitly releases one [`Session`].
#[derive(Debug)]
pub struct SessionManager {
    config: SessionConfig,
    session: Option<Session>,
}

impl SessionManager {
    /// Creates a manager; no client is built until [`acquire`](Self::acquire).
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Returns the open session, building it first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the client cannot be constructed.
    pub fn acquire(&mut self) -> Result<&Session, SessionError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                debug!("opening HTTP session");
                Session::connect(&self.config)?
            }
        };
        Ok(self.session.insert(session))
    }

    /// Closes the session and its connection pool. No-op when none is open.
    pub fn release(&mut self) {
        if self.session.take().is_some() {
            debug!("released HTTP session");
        }
    }

    /// Returns true while a session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The configuration new sessions are built from.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_session_manager_is_lazy_and_idempotent() {
        let mut sessions = SessionManager::new(SessionConfig::default());
        assert!(!sessions.is_open());

        let first = std::ptr::from_ref(sessions.acquire().unwrap());
        let second = std::ptr::from_ref(sessions.acquire().unwrap());
        assert_eq!(first, second, "acquire must reuse the open session");
        assert!(sessions.is_open());
    }

    #[test]
    fn test_session_manager_release_is_safe_when_closed() {
        let mut sessions = SessionManager::new(SessionConfig::default());
        sessions.release();
        sessions.acquire().unwrap();
        sessions.release();
        sessions.release();
        assert!(!sessions.is_open());
    }

    #[test]
    fn test_session_config_drops_blank_proxies() {
        let config = SessionConfig::default().with_proxies(["", "  ", "http://proxy.local:3128"]);
        assert_eq!(config.proxies, vec!["http://proxy.local:3128".to_string()]);
    }

    #[tokio::test]
    async fn test_get_document_reports_status_without_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&mock_server)
            .await;

        let session = Session::connect(&SessionConfig::default()).unwrap();
        let page = session
            .get_document(&format!("{}/gone", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(page.status, 404);
        assert!(!page.is_success());
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_get_document_follows_redirects_and_decodes_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/pin/42/", mock_server.uri())),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pin/42/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>pin</html>"))
            .mount(&mock_server)
            .await;

        let session = Session::connect(&SessionConfig::default()).unwrap();
        let page = session
            .get_document(&format!("{}/short", mock_server.uri()))
            .await
            .unwrap();
        assert!(page.is_success());
        assert_eq!(page.final_url.path(), "/pin/42/");
        assert_eq!(page.body, "<html>pin</html>");
    }

    #[tokio::test]
    async fn test_head_non_success_is_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("HEAD"))
            .and(path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&mock_server)
            .await;

        let session = Session::connect(&SessionConfig::default()).unwrap();
        let result = session
            .head(&format!("{}/clip.mp4", mock_server.uri()))
            .await;
        assert!(matches!(
            result,
            Err(SessionError::HttpStatus { status: 405, .. })
        ));
    }

    #[tokio::test]
    async fn test_request_timeout_is_classified() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let config = SessionConfig::default().with_request_timeout(Duration::from_millis(200));
        let session = Session::connect(&config).unwrap();
        let result = session
            .get_stream(&format!("{}/slow", mock_server.uri()))
            .await;
        assert!(matches!(result, Err(SessionError::Timeout { .. })));
    }
}
