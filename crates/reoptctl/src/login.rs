//! Session establishment.
//!
//! A pre-issued token wins when no explicit credentials were passed on
//! the command line; otherwise an interactive email/password loop runs
//! with a bounded number of attempts. Credential seeds from flags or
//! the settings file are used for the first attempt only -- after a
//! rejection the loop prompts fresh.

use std::io::IsTerminal;

use dialoguer::Input;
use reopt_api::ApiClient;
use reopt_core::CoreError;
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::error::CliError;

const MAX_ATTEMPTS: u32 = 3;

/// Log in on `client`, preferring the token path.
///
/// Only credentials given on the command line displace a resolved
/// token; an email from the settings file never selects the
/// interactive path by itself, it just seeds the first prompt.
pub async fn establish_session(
    client: &ApiClient,
    token: Option<SecretString>,
    cli_email: Option<String>,
    cli_password: Option<SecretString>,
    settings_email: Option<String>,
) -> Result<(), CliError> {
    match token {
        Some(token) if cli_email.is_none() && cli_password.is_none() => {
            debug!("logging in with pre-issued token");
            match client.login_with_token(token).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_auth() => Err(CliError::AuthFailed {
                    message: "auth token login failure, please check token".into(),
                }),
                Err(e) => Err(CoreError::from(e).into()),
            }
        }
        _ => interactive_login(client, cli_email.or(settings_email), cli_password).await,
    }
}

// ── Interactive login state machine ──────────────────────────────────

#[derive(Debug)]
enum AuthState {
    NeedCredentials {
        email: Option<String>,
        password: Option<SecretString>,
    },
    Authenticating {
        email: String,
        password: SecretString,
    },
    Authenticated,
    Failed {
        message: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum CredentialGate {
    Prompt,
    NoTerminal,
    GiveUp,
}

/// Decide how to leave `NeedCredentials` without touching the terminal.
fn credential_gate(
    attempts: u32,
    interactive: bool,
    have_email: bool,
    have_password: bool,
) -> CredentialGate {
    if attempts >= MAX_ATTEMPTS {
        CredentialGate::GiveUp
    } else if !interactive && !(have_email && have_password) {
        CredentialGate::NoTerminal
    } else {
        CredentialGate::Prompt
    }
}

async fn interactive_login(
    client: &ApiClient,
    email: Option<String>,
    password: Option<SecretString>,
) -> Result<(), CliError> {
    let interactive = std::io::stdin().is_terminal();
    let mut attempts: u32 = 0;
    let mut state = AuthState::NeedCredentials { email, password };

    loop {
        state = match state {
            AuthState::NeedCredentials { email, password } => {
                match credential_gate(attempts, interactive, email.is_some(), password.is_some()) {
                    CredentialGate::GiveUp => AuthState::Failed {
                        message: format!("login failed after {MAX_ATTEMPTS} attempts"),
                    },
                    CredentialGate::NoTerminal => AuthState::Failed {
                        message: "no credentials provided and no terminal to prompt on".into(),
                    },
                    CredentialGate::Prompt => {
                        let email = match email {
                            Some(email) => email,
                            None => prompt_email()?,
                        };
                        let password = match password {
                            Some(password) => password,
                            None => prompt_password()?,
                        };
                        AuthState::Authenticating { email, password }
                    }
                }
            }

            AuthState::Authenticating { email, password } => {
                attempts += 1;
                match client.login(&email, &password).await {
                    Ok(()) => AuthState::Authenticated,
                    Err(e) if e.is_auth() => {
                        warn!(attempt = attempts, error = %e, "login rejected");
                        // Seeds are dropped after a rejection.
                        AuthState::NeedCredentials {
                            email: None,
                            password: None,
                        }
                    }
                    Err(e) => return Err(CoreError::from(e).into()),
                }
            }

            AuthState::Authenticated => return Ok(()),

            AuthState::Failed { message } => return Err(CliError::AuthFailed { message }),
        };
    }
}

// ── Prompt helpers ───────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_email() -> Result<String, CliError> {
    Input::new()
        .with_prompt("login email")
        .interact_text()
        .map_err(prompt_err)
}

fn prompt_password() -> Result<SecretString, CliError> {
    let pass = rpassword::prompt_password("login password: ").map_err(prompt_err)?;
    Ok(SecretString::from(pass))
}
