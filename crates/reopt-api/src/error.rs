use thiserror::Error;

/// Top-level error type for the `reopt-api` crate.
///
/// Covers authentication, transport, and controller API failures.
/// `reopt-core` maps these into per-site outcomes or fatal run errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (bad credentials, rejected token, missing tenant).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A tenant-scoped request was attempted before a session existed.
    #[error("No active session -- login first")]
    NoSession,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Structured error from the controller, parsed from the `_error`
    /// array. `body` keeps the raw response text so callers can surface
    /// the full diagnostic payload alongside the parsed message.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the controller rejected the credentials or session.
    ///
    /// The interactive login flow retries only on these; transport faults
    /// abort immediately.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NoSession)
    }

    /// The raw response body, when the failure carried one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } | Self::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The controller's error code, if the response carried one.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
