//! CLI-owned configuration: settings file, credential chain, and
//! transport construction.
//!
//! Settings are merged once at startup (defaults, then the TOML file,
//! then `REOPTCTL_*` environment variables, then CLI flags) and passed
//! on by reference. Core never sees these types -- it receives a ready
//! `ApiClient`.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use reopt_api::{ApiClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::CliError;

/// Production controller endpoint, used when no override is given.
pub const DEFAULT_CONTROLLER: &str = "https://api.elcapitan.cloudgenix.com";

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Controller base URI.
    pub controller: String,

    /// Pre-issued auth token (plaintext -- prefer the env vars).
    pub auth_token: Option<String>,

    /// Login email used to seed the interactive prompt.
    pub email: Option<String>,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controller: DEFAULT_CONTROLLER.into(),
            auth_token: None,
            email: None,
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ── Settings file path ───────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "reoptctl", "reoptctl")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("reoptctl");
    p
}

// ── Settings loading ─────────────────────────────────────────────────

/// Load settings from defaults + file + environment.
pub fn load_settings() -> Result<Settings, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("REOPTCTL_"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Load settings, falling back to the defaults if merging fails. The
/// failure is logged so a broken settings file is not silently ignored.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid settings file; using defaults");
        Settings::default()
    })
}

/// Fold CLI flag overrides into the merged settings. Flags win over
/// every other source.
pub fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(ref controller) = cli.controller {
        settings.controller = controller.clone();
    }
    if cli.insecure {
        settings.insecure = true;
    }
    if let Some(ref email) = cli.email {
        settings.email = Some(email.clone());
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout = timeout;
    }
    settings
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve a pre-issued auth token: settings file first, then
/// `X_AUTH_TOKEN`, then `AUTH_TOKEN`.
pub fn resolve_token(settings: &Settings) -> Option<SecretString> {
    settings
        .auth_token
        .clone()
        .or_else(|| token_from_env(|name| std::env::var(name).ok()))
        .map(SecretString::from)
}

/// Env var half of the token chain. Empty values fall through to the
/// next source.
fn token_from_env(get: impl Fn(&str) -> Option<String>) -> Option<String> {
    get("X_AUTH_TOKEN")
        .filter(|t| !t.is_empty())
        .or_else(|| get("AUTH_TOKEN").filter(|t| !t.is_empty()))
}

// ── Client construction ──────────────────────────────────────────────

/// Build an unauthenticated `ApiClient` from the merged settings.
pub fn build_client(settings: &Settings) -> Result<ApiClient, CliError> {
    let url: url::Url = settings
        .controller
        .parse()
        .map_err(|_| CliError::Validation {
            field: "controller".into(),
            reason: format!("invalid URI: {}", settings.controller),
        })?;

    let tls = if settings.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca) = settings.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    };

    let transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(settings.timeout),
    };

    ApiClient::new(url, &transport).map_err(|e| CliError::ConnectionFailed {
        reason: e.to_string(),
    })
}
