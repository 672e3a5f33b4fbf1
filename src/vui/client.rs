//! VUI Client
//!
//! Main client for the VUI API, combining the session and HTTP
//! functionality. Every resource view holds a clone of the client, so all
//! views of one client share its session.

use super::auth::{self, Session};
use super::error::{Error, Result};
use super::http::{self, RequestOptions, VuiHttpClient};
use super::links::{parse_links, Links};
use super::platforms::Platforms;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Main VUI client
#[derive(Clone, Debug)]
pub struct VuiClient {
    pub http: VuiHttpClient,
    auth_url: String,
    vui_url: Option<String>,
    session: Arc<RwLock<Option<Session>>>,
}

impl VuiClient {
    /// Create an unauthenticated client for the given auth endpoint
    pub fn new(auth_url: &str) -> Result<Self> {
        Ok(Self {
            http: VuiHttpClient::new()?,
            auth_url: auth_url.to_string(),
            vui_url: None,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Resolve relative links against `vui_url` instead of the auth URL's origin
    pub fn with_vui_url(mut self, vui_url: &str) -> Self {
        self.vui_url = Some(vui_url.to_string());
        self
    }

    /// Create a client around an existing session
    pub fn with_session(session: Session) -> Result<Self> {
        Ok(Self {
            http: VuiHttpClient::new()?,
            auth_url: session.auth_url().to_string(),
            vui_url: Some(session.base_url().to_string()),
            session: Arc::new(RwLock::new(Some(session))),
        })
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Log in and store the session.
    ///
    /// A client keeps at most one session: when one is already established
    /// this is a no-op and the existing session is returned. Call
    /// [`clear_session`](Self::clear_session) first to log in again.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let mut slot = self.session.write().await;

        if let Some(existing) = slot.as_ref() {
            tracing::debug!("Session already established, keeping existing token");
            return Ok(existing.clone());
        }

        let session = auth::authenticate(
            &self.http,
            &self.auth_url,
            username,
            password,
            self.vui_url.as_deref(),
        )
        .await?;

        *slot = Some(session.clone());
        Ok(session)
    }

    /// Drop the current session
    pub async fn clear_session(&self) {
        let mut slot = self.session.write().await;
        if slot.take().is_some() {
            tracing::debug!("Session cleared");
        }
    }

    /// The current session, or an authentication error when there is none
    pub async fn session(&self) -> Result<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::Authentication("Authentication not set.".to_string()))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Entry point of the navigation tree
    pub async fn platforms(&self) -> Result<Platforms> {
        self.session()
            .await
            .map_err(|_| Error::Authentication("Authenticate before accessing platforms.".to_string()))?;
        Ok(Platforms::new(self.clone()))
    }

    /// Issue a request to a link or path and return the raw response
    pub async fn send(&self, method: Method, target: &str, options: RequestOptions) -> Result<Response> {
        let session = self.session.read().await.clone();

        let url = match session.as_ref() {
            Some(session) => session.resolve(target),
            None if target.starts_with("http") => target.to_string(),
            None => {
                return Err(Error::Authentication(format!(
                    "no session to resolve {} against",
                    target
                )))
            }
        };

        let token = if options.auth_required() {
            let session = session
                .as_ref()
                .ok_or_else(|| Error::Authentication("Authentication not set.".to_string()))?;
            Some(session.access_token().to_string())
        } else {
            None
        };

        self.http.send(method, &url, token.as_deref(), options).await
    }

    /// Make a GET request to the VUI API
    pub async fn get(&self, target: &str, options: RequestOptions) -> Result<Response> {
        self.send(Method::GET, target, options).await
    }

    /// Make a POST request to the VUI API
    pub async fn post(&self, target: &str, options: RequestOptions) -> Result<Response> {
        self.send(Method::POST, target, options).await
    }

    /// Make a PUT request to the VUI API
    pub async fn put(&self, target: &str, options: RequestOptions) -> Result<Response> {
        self.send(Method::PUT, target, options).await
    }

    /// Make a DELETE request to the VUI API
    pub async fn delete(&self, target: &str, options: RequestOptions) -> Result<Response> {
        self.send(Method::DELETE, target, options).await
    }

    /// GET a resource and parse its body, failing on non-success statuses
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        target: &str,
        options: RequestOptions,
        context: &'static str,
    ) -> Result<T> {
        let response = self.get(target, options).await?;
        http::read_json(response, context).await
    }

    /// GET a hypermedia resource and extract its link map
    pub(crate) async fn get_links(
        &self,
        target: &str,
        options: RequestOptions,
        context: &'static str,
    ) -> Result<Links> {
        let body: Value = self.get_json(target, options, context).await?;
        parse_links(body, context)
    }
}

/// Format a VUI client error for display
pub fn format_vui_error(error: &Error) -> String {
    super::http::format_vui_error(error)
}
