// Controller API wire types
//
// Models for the tenant API. Fields use `#[serde(default)]` liberally and
// carry a flattened catch-all map because the controller grows payloads
// across releases without bumping the endpoint version every time.

use serde::{Deserialize, Serialize};

// ── Collection envelope ──────────────────────────────────────────────

/// Collection responses arrive as `{ "count": N, "items": [...] }`.
///
/// `items` stays attribute-free: a field-level `default` would make the
/// derived impl demand `T: Default`.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default)]
    pub count: Option<u64>,
    pub items: Vec<T>,
}

// ── Sites ────────────────────────────────────────────────────────────

/// Role of a site's element cluster in the fabric topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterRole {
    #[serde(rename = "SPOKE")]
    Spoke,
    #[serde(rename = "HUB")]
    Hub,
    /// Roles this client doesn't model yet, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Site record from the tenant site directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub element_cluster_role: Option<ClusterRole>,
    #[serde(default)]
    pub admin_state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Site extensions ──────────────────────────────────────────────────

/// Extension record attached to a site.
///
/// Extensions are namespaced feature toggles; `conf` is an arbitrary
/// object whose shape depends on the namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteExtension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub conf: Option<ExtensionConf>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The `conf` object of an extension. Only `disable_reopt` is modeled
/// explicitly; keys from other namespaces land in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionConf {
    #[serde(default)]
    pub disable_reopt: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Creation payload for a new site extension. No `id` -- the controller
/// assigns one and echoes the stored record back.
#[derive(Debug, Clone, Serialize)]
pub struct SiteExtensionPayload {
    pub name: String,
    pub namespace: String,
    pub entity_id: String,
    pub disabled: bool,
    pub conf: ExtensionConf,
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Response from `POST /v2.0/api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub x_auth_token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Operator profile from `GET /v2.0/api/profile`.
///
/// A session is only usable once `tenant_id` is known; a token the
/// controller accepts but that yields no tenant is treated as rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
