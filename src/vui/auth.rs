//! VUI Authentication
//!
//! Exchanges a username and password for a bearer token and derives the
//! base URL every relative hypermedia link is resolved against.

use super::error::{Error, Result};
use super::http::{RequestOptions, VuiHttpClient};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use url::Url;

/// Default authentication endpoint of a local VOLTTRON web service
pub const DEFAULT_AUTH_URL: &str = "http://localhost:8070/authenticate";

/// Token pair returned by the authentication endpoint
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// An authenticated session: bearer token plus the API base URL
#[derive(Clone)]
pub struct Session {
    auth_url: String,
    base_url: String,
    access_token: String,
    refresh_token: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("auth_url", &self.auth_url)
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Session {
    /// Build a session from an already issued token
    pub fn new(auth_url: &str, base_url: &str, access_token: &str) -> Self {
        Self {
            auth_url: auth_url.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            refresh_token: None,
        }
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Refresh token handed out at login. Never used: tokens are not refreshed.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Resolve a link or path against the base URL.
    /// Absolute `http(s)` URLs pass through untouched.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http") {
            return target.to_string();
        }
        format!("{}/{}", self.base_url, target.trim_start_matches('/'))
    }
}

/// Derive `scheme://host:port` from the auth URL
pub fn derive_base_url(auth_url: &str) -> Result<String> {
    let parsed = Url::parse(auth_url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::Authentication(format!("auth URL has no host: {}", auth_url)))?;

    Ok(match parsed.port_or_known_default() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// POST credentials to `auth_url` and build a session from the returned token.
///
/// `vui_url` overrides the base URL otherwise derived from `auth_url`.
pub async fn authenticate(
    http: &VuiHttpClient,
    auth_url: &str,
    username: &str,
    password: &str,
    vui_url: Option<&str>,
) -> Result<Session> {
    let base_url = match vui_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => derive_base_url(auth_url)?,
    };

    tracing::info!("Authenticating {} against {}", username, auth_url);

    let options = RequestOptions::new()
        .without_auth()
        .json(json!({ "username": username, "password": password }));
    let response = http.send(Method::POST, auth_url, None, options).await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Authentication rejected: {}", status);
        return Err(Error::Authentication(format!(
            "{} returned {}",
            auth_url, status
        )));
    }

    let tokens: TokenResponse = response.json().await.map_err(|e| {
        Error::Authentication(format!("unexpected authentication response: {}", e))
    })?;

    tracing::debug!("Session established, base URL {}", base_url);

    Ok(Session {
        auth_url: auth_url.to_string(),
        base_url,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    })
}
