//! Configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Client and server settings are read once at startup by `from_env`
//! constructors. Unset variables fall back to defaults; set-but-invalid
//! values are reported as [`ConfigError`] rather than silently ignored.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOAST_TTL_MS: u64 = 3000;
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Parse { var: String, value: String },
}

// =============================================================================
// CLIENT
// =============================================================================

/// Settings for the toggle controller and its HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the toggle endpoint is served from, without trailing slash.
    pub base_url: String,
    /// Value of the `session_token` cookie sent with every request.
    pub session_token: Option<String>,
    pub connect_timeout: Duration,
    /// How long a notification stays visible before auto-dismissal.
    pub toast_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_token: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            toast_ttl: Duration::from_millis(DEFAULT_TOAST_TTL_MS),
        }
    }
}

impl ClientConfig {
    /// Build client config from environment variables.
    ///
    /// - `FAVORITES_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `FAVORITES_SESSION_TOKEN`: optional session cookie value
    /// - `FAVORITES_CONNECT_TIMEOUT_SECS`: default 10
    /// - `TOAST_TTL_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("FAVORITES_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let session_token = std::env::var("FAVORITES_SESSION_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let connect_secs = env_parse("FAVORITES_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let toast_ms = env_parse("TOAST_TTL_MS", DEFAULT_TOAST_TTL_MS)?;

        Ok(Self {
            base_url,
            session_token,
            connect_timeout: Duration::from_secs(connect_secs),
            toast_ttl: Duration::from_millis(toast_ms),
        })
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// Settings for the reference toggle server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Documents the server will accept. Empty means any identifier.
    pub known_documents: Vec<String>,
    pub trace_http: bool,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// - `PORT`: default 5000
    /// - `FAVORITES_KNOWN_DOCUMENTS`: comma-separated ids, default empty
    /// - `FAVORITES_TRACE_HTTP`: default true
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `FAVORITES_TRACE_HTTP` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let known_documents = std::env::var("FAVORITES_KNOWN_DOCUMENTS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();
        let trace_http = match std::env::var("FAVORITES_TRACE_HTTP") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Parse { var: "FAVORITES_TRACE_HTTP".into(), value: raw })?,
            Err(_) => true,
        };

        Ok(Self { port, known_documents, trace_http })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Parse the usual boolean spellings, case-insensitively and trimmed.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { var: key.to_owned(), value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
