//! Favorite API: transport seam for the toggle controller.
//!
//! DESIGN
//! ======
//! [`FavoriteApi`] is the only thing the controller knows about the
//! network. Only transport failures are errors here: the HTTP status and
//! the raw body come back untouched so the controller can apply its own
//! success, rejection and fallback rules.
//!
//! [`HttpFavoriteApi`] is the `reqwest` implementation. The session is
//! carried by a `session_token` cookie in the client's cookie jar, the
//! document id is pushed as a single percent-encoded path segment, and the
//! request has no body.

use std::sync::Arc;

use reqwest::Url;
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::config::ClientConfig;

pub const SESSION_COOKIE: &str = "session_token";
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const REQUESTED_WITH_VALUE: &str = "fetch";

const TOGGLE_PATH: [&str; 2] = ["favorites", "toggle"];
const STATE_PATH: [&str; 1] = ["favorites"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("document id cannot be sent as a path segment: {0:?}")]
    UnaddressableId(String),
}

/// Raw result of a toggle request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    pub status: u16,
    pub body: String,
}

impl ToggleResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The authoritative favorite state, if the body carries one.
    #[must_use]
    pub fn favorited(&self) -> Option<bool> {
        parse_favorited(&self.body)
    }
}

/// Extract a boolean `favorited` member from a JSON object body.
///
/// Returns `None` for empty or non-JSON bodies, non-object JSON, and
/// objects where the member is missing or not a boolean.
#[must_use]
pub fn parse_favorited(body: &str) -> Option<bool> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.as_object()?.get("favorited")?.as_bool()
}

/// Whether `document_id` survives as a URL path segment.
///
/// `.` and `..` are dot segments: URL normalization drops them, so the
/// request would not name a document.
#[must_use]
pub fn is_addressable(document_id: &str) -> bool {
    !matches!(document_id, "." | "..")
}

/// Server operations the favorite controller depends on.
#[async_trait::async_trait]
pub trait FavoriteApi: Send + Sync {
    /// Ask the server to flip the favorite state of `document_id`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] only when no HTTP response was obtained.
    async fn toggle(&self, document_id: &str) -> Result<ToggleResponse, ApiError>;

    /// Fetch the current favorite state of `document_id` for this session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    async fn favorite_state(&self, document_id: &str) -> Result<Option<bool>, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpFavoriteApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpFavoriteApi {
    /// Build the HTTP transport from client config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or cannot carry a
    /// path, or the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let jar = Arc::new(Jar::default());
        if let Some(token) = &config.session_token {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={token}; Path=/"), &base);
        }

        let http = reqwest::Client::builder()
            .cookie_provider(jar)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, base })
    }

    fn toggle_url(&self, document_id: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, &TOGGLE_PATH, document_id)
    }

    fn state_url(&self, document_id: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, &STATE_PATH, document_id)
    }
}

#[async_trait::async_trait]
impl FavoriteApi for HttpFavoriteApi {
    async fn toggle(&self, document_id: &str) -> Result<ToggleResponse, ApiError> {
        let response = self
            .http
            .post(self.toggle_url(document_id)?)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        // An unreadable body is handled like an absent one.
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(%document_id, error = %e, "toggle response body unreadable");
                String::new()
            }
        };

        Ok(ToggleResponse { status, body })
    }

    async fn favorite_state(&self, document_id: &str) -> Result<Option<bool>, ApiError> {
        let response = self
            .http
            .get(self.state_url(document_id)?)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(parse_favorited(&body))
    }
}

/// Append `prefix` segments and the percent-encoded document id to `base`.
fn endpoint(base: &Url, prefix: &[&str], document_id: &str) -> Result<Url, ApiError> {
    if !is_addressable(document_id) {
        return Err(ApiError::UnaddressableId(document_id.to_owned()));
    }
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(prefix).push(document_id);
    }
    Ok(url)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
