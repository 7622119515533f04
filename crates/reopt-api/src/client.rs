// Controller HTTP client
//
// Wraps `reqwest::Client` with versioned tenant URL construction, the
// `X-Auth-Token` header, and `_error` body parsing. Endpoint groups
// (sites, extensions, auth) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape: `{"_error": [{"code": "...", "message": "..."}]}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "_error")]
    errors: Vec<ErrorEntry>,
}

#[derive(serde::Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the controller tenant API.
///
/// Session state (auth token + tenant id) is captured by the login flow
/// and injected into every subsequent request. Tenant-scoped URLs cannot
/// be built before a session exists.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token, sent as `X-Auth-Token` once set.
    auth_token: RwLock<Option<SecretString>>,
    /// Tenant id from the profile endpoint; scopes all resource URLs.
    tenant_id: RwLock<Option<String>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create an unauthenticated client from a base URL and transport
    /// settings. Call one of the login methods before tenant operations.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth_token: RwLock::new(None),
            tenant_id: RwLock::new(None),
        })
    }

    /// Create a client with an already-established session.
    ///
    /// Use this when token and tenant are known up front -- no login
    /// round-trip is performed.
    pub fn with_session(
        base_url: Url,
        transport: &TransportConfig,
        token: SecretString,
        tenant_id: String,
    ) -> Result<Self, Error> {
        let client = Self::new(base_url, transport)?;
        client.set_token(token);
        client.set_tenant_id(tenant_id);
        Ok(client)
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The tenant id of the current session, if logged in.
    pub fn tenant_id(&self) -> Option<String> {
        self.tenant_id.read().expect("tenant lock poisoned").clone()
    }

    // ── Session state ────────────────────────────────────────────────

    pub(crate) fn set_token(&self, token: SecretString) {
        debug!("storing auth token");
        *self.auth_token.write().expect("token lock poisoned") = Some(token);
    }

    pub(crate) fn set_tenant_id(&self, tenant: String) {
        *self.tenant_id.write().expect("tenant lock poisoned") = Some(tenant);
    }

    pub(crate) fn clear_session(&self) {
        *self.auth_token.write().expect("token lock poisoned") = None;
        *self.tenant_id.write().expect("tenant lock poisoned") = None;
    }

    /// Apply the stored auth token to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.auth_token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.header("X-Auth-Token", token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a controller-level URL: `{base}/{version}/api/{path}`.
    ///
    /// Endpoints carry their own API version, so the version segment is a
    /// per-call argument rather than part of the base URL.
    pub(crate) fn api_url(&self, version: &str, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{version}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    /// Build a tenant-scoped URL: `{base}/{version}/api/tenants/{tenant}/{path}`.
    ///
    /// Fails with [`Error::NoSession`] before login -- the tenant id is
    /// only known once the profile has been fetched.
    pub(crate) fn tenant_url(&self, version: &str, path: &str) -> Result<Url, Error> {
        let tenant = self.tenant_id().ok_or(Error::NoSession)?;
        Ok(self.api_url(version, &format!("tenants/{tenant}/{path}")))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_response(resp).await
    }

    /// Send a GET request, checking the status but discarding the body.
    pub(crate) async fn get_no_response(&self, url: Url) -> Result<(), Error> {
        debug!("GET {}", url);

        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_empty(resp).await
    }

    /// Send a POST request with a JSON body and parse the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_response(resp).await
    }

    /// Send a DELETE request, checking the status but discarding the body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let resp = self
            .apply_auth(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Check the status, then deserialize the body.
    ///
    /// Failures keep the raw body next to the parsed message so callers
    /// can surface the controller's full diagnostic payload.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            // The body is arbitrary text; truncate by characters, not bytes.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Status-only variant of [`Self::handle_response`].
    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Parse a non-success response into [`Error::Api`], salvaging the
    /// `_error` array when the body carries one.
    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let body = resp.text().await.unwrap_or_default();

        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
            if let Some(first) = parsed.errors.first() {
                return Error::Api {
                    status: status.as_u16(),
                    message: first
                        .message
                        .clone()
                        .or_else(|| first.code.clone())
                        .unwrap_or_else(|| status.to_string()),
                    code: first.code.clone(),
                    body,
                };
            }
        }

        Error::Api {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body.clone()
            },
            code: None,
            body,
        }
    }
}
