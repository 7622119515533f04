// Controller authentication
//
// Token-header sessions: login yields an `x_auth_token`, after which every
// request carries `X-Auth-Token`. A session is only considered established
// once the profile endpoint reports a tenant id -- a token that fails that
// check is rejected even if the controller accepted it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginResponse, Profile};

impl ApiClient {
    /// Authenticate with email/password.
    ///
    /// `POST /v2.0/api/login`, then a profile fetch to bind the tenant id.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("v2.0", "login");
        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        // Controller rejections on this endpoint are credential problems,
        // whatever shape the body takes.
        let resp: LoginResponse = self.post(url, &body).await.map_err(|e| match e {
            Error::Api {
                status, message, ..
            } => Error::Authentication {
                message: format!("login failed (HTTP {status}): {message}"),
            },
            other => other,
        })?;

        let token = resp.x_auth_token.ok_or_else(|| Error::Authentication {
            message: "login response carried no auth token".into(),
        })?;

        self.set_token(SecretString::from(token));
        self.bind_tenant().await?;

        debug!("login successful");
        Ok(())
    }

    /// Establish a session from a pre-issued auth token.
    ///
    /// The token is stored and validated by fetching the profile. On
    /// rejection the stored token is cleared again.
    pub async fn login_with_token(&self, token: SecretString) -> Result<(), Error> {
        self.set_token(token);
        if let Err(e) = self.bind_tenant().await {
            self.clear_session();
            return Err(e);
        }
        debug!("token session established");
        Ok(())
    }

    /// Fetch the operator profile.
    ///
    /// `GET /v2.0/api/profile`
    pub async fn profile(&self) -> Result<Profile, Error> {
        let url = self.api_url("v2.0", "profile");
        self.get(url).await
    }

    /// End the current session.
    ///
    /// `GET /v2.0/api/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("v2.0", "logout");
        debug!("logging out at {}", url);
        self.get_no_response(url).await?;
        self.clear_session();
        debug!("logout complete");
        Ok(())
    }

    /// Fetch the profile and bind its tenant id to the session.
    async fn bind_tenant(&self) -> Result<(), Error> {
        let profile = self.profile().await?;
        match profile.tenant_id {
            Some(tenant) if !tenant.is_empty() => {
                debug!(tenant, "session bound to tenant");
                self.set_tenant_id(tenant);
                Ok(())
            }
            _ => Err(Error::Authentication {
                message: "profile has no tenant id".into(),
            }),
        }
    }
}
