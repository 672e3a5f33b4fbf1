//! HTTP utilities for VUI REST API calls

use super::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Per-request options for the facade verbs
#[derive(Debug, Clone)]
pub struct RequestOptions {
    headers: HeaderMap,
    auth_required: bool,
    query: Vec<(String, String)>,
    json: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            auth_required: true,
            query: Vec::new(),
            json: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the request without an `Authorization` header
    pub fn without_auth(mut self) -> Self {
        self.auth_required = false;
        self
    }

    /// Add an extra request header
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn auth_required(&self) -> bool {
        self.auth_required
    }
}

/// HTTP client wrapper for VUI API calls
#[derive(Clone, Debug)]
pub struct VuiHttpClient {
    client: Client,
}

impl VuiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vui-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Send a request to an already resolved URL, returning the raw response.
    ///
    /// Non-success statuses are not turned into errors here; callers branch
    /// on [`Response::status`].
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        options: RequestOptions,
    ) -> Result<Response> {
        tracing::debug!("{} {}", method, url);

        let RequestOptions {
            mut headers,
            query,
            json,
            ..
        } = options;

        if json.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        // The session token replaces any caller supplied Authorization header
        if let Some(token) = token {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }

        let mut request = self.client.request(method.clone(), url).headers(headers);

        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = json.as_ref() {
            request = request.json(body);
        }

        let response = request.send().await?;
        tracing::debug!("{} {} -> {}", method, url, response.status());

        Ok(response)
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        Error::Authentication("access token is not a valid header value".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Read a response body as `T`, failing on non-success statuses
pub async fn read_json<T: DeserializeOwned>(response: Response, context: &'static str) -> Result<T> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        // Only log sanitized/truncated error body to avoid leaking sensitive data
        tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        return Err(Error::Status {
            status: status.as_u16(),
            url,
        });
    }

    serde_json::from_str(&body).map_err(Error::invalid_response(context))
}

/// Format a VUI client error for display
/// Sanitizes error messages to avoid leaking raw server responses
pub fn format_vui_error(error: &Error) -> String {
    match error {
        Error::Authentication(_) => {
            "Authentication failed. Check the auth URL and your credentials.".to_string()
        }
        Error::Status { status: 401, .. } => "Session rejected by the server. Log in again.".to_string(),
        Error::Status { status: 403, .. } => "Permission denied.".to_string(),
        Error::Status { status: 404, .. } => "Resource not found.".to_string(),
        Error::Status { status, .. } if *status >= 500 => {
            "VUI service temporarily unavailable. Please try again.".to_string()
        }
        Error::Status { status, .. } => format!("Request failed with status {}.", status),
        Error::Http(_) => "Request failed. Check your network connection and try again.".to_string(),
        Error::InvalidResponse { context, .. } => format!("Unexpected {} response from server.", context),
        other => {
            let message = other.to_string();
            let sanitized = message
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < message.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}
