// ── Core error types ──
//
// Failures from the reconciliation layer. The `From<reopt_api::Error>`
// impl translates transport-level errors into domain variants; the raw
// controller payload rides along in `detail` so per-site reports can
// show the full diagnostic.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── API errors ───────────────────────────────────────────────────
    /// Controller rejected an operation. `detail` carries the raw
    /// response body when one was available.
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
        detail: Option<String>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed controller response: {message}")]
    Malformed {
        message: String,
        detail: Option<String>,
    },
}

impl CoreError {
    /// The raw controller payload behind this error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } | Self::Malformed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<reopt_api::Error> for CoreError {
    fn from(err: reopt_api::Error) -> Self {
        match err {
            reopt_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            reopt_api::Error::NoSession => CoreError::AuthenticationFailed {
                message: "no active session".into(),
            },
            reopt_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                        detail: None,
                    }
                }
            }
            reopt_api::Error::InvalidUrl(e) => CoreError::ConnectionFailed {
                reason: format!("invalid URL: {e}"),
            },
            reopt_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            reopt_api::Error::Api {
                status,
                message,
                code,
                body,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
                detail: Some(body),
            },
            reopt_api::Error::Deserialization { message, body } => CoreError::Malformed {
                message,
                detail: Some(body),
            },
        }
    }
}
