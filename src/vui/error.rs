//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No session has been established, or logging in failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A platform looked up by name does not exist.
    #[error("Invalid platform reference: {0}")]
    InvalidPlatformReference(String),

    /// An agent looked up by identity does not exist on its platform.
    #[error("Invalid agent reference: {identity} on platform {platform}")]
    InvalidAgentReference {
        /// Platform the agent was looked up on.
        platform: String,
        /// VIP identity of the agent.
        identity: String,
    },

    /// The agent exposes no RPC link with this function name.
    #[error("Invalid RPC function: {0}")]
    InvalidRpcFunction(String),

    /// A resource does not carry a link the operation has to follow.
    #[error("{resource} has no '{key}' link")]
    MissingLink {
        /// Kind and name of the resource, e.g. `platform p1`.
        resource: String,
        /// Link key that was looked up.
        key: String,
    },

    /// Server answered a request whose body was required with a non-success status.
    #[error("API request failed ({status}): {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Resolved request URL.
        url: String,
    },

    /// A response body did not match the expected schema.
    #[error("Invalid {context} response: {source}")]
    InvalidResponse {
        /// Which response was being parsed.
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A response field held a value outside its documented format.
    #[error("Invalid {field} value: {value}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_)) || matches!(self, Error::Status { status: 401, .. })
    }

    /// Check if this error means the referenced resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::InvalidPlatformReference(_)
                | Error::InvalidAgentReference { .. }
                | Error::InvalidRpcFunction(_)
                | Error::Status { status: 404, .. }
        )
    }

    pub(crate) fn invalid_response(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Error::InvalidResponse { context, source }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
