//! Agent RPC
//!
//! One link per function an agent exposes. Executing a function POSTs its
//! keyword arguments as a JSON object to that link.

use super::client::VuiClient;
use super::error::{Error, Result};
use super::http::RequestOptions;
use super::links::{Links, Resource};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Result of an RPC call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub data: Value,
    /// Set when the body is an object carrying an `error` member
    pub error: bool,
}

impl RpcResponse {
    pub fn from_body(data: Value) -> Self {
        let error = data.get("error").is_some();
        Self { data, error }
    }
}

/// Invocable functions of one agent
#[derive(Clone)]
pub struct AgentRpc {
    client: VuiClient,
    pub identity: String,
    pub links: Links,
}

impl fmt::Debug for AgentRpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRpc")
            .field("identity", &self.identity)
            .field("links", &self.links)
            .finish()
    }
}

impl Serialize for AgentRpc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.links.serialize(serializer)
    }
}

impl Resource for AgentRpc {
    fn describe(&self) -> String {
        format!("rpc of agent {}", self.identity)
    }

    fn links(&self) -> &Links {
        &self.links
    }
}

impl AgentRpc {
    pub(crate) fn new(client: VuiClient, identity: String, links: Links) -> Self {
        Self {
            client,
            identity,
            links,
        }
    }

    /// Names of the functions that can be executed
    pub fn functions(&self) -> Vec<&str> {
        self.links.keys().collect()
    }

    /// Execute `function` with `kwargs` serialized as the JSON body.
    ///
    /// Returns `Ok(None)` when the server answers with a non-success status.
    pub async fn execute<B>(&self, function: &str, kwargs: &B) -> Result<Option<RpcResponse>>
    where
        B: Serialize + ?Sized,
    {
        let link = self
            .links
            .get(function)
            .ok_or_else(|| Error::InvalidRpcFunction(function.to_string()))?;

        let body = kwargs_body(kwargs)?;
        let response = self
            .client
            .post(&link.url, RequestOptions::new().json(body))
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("RPC {}.{} failed: {}", self.identity, function, status);
            return Ok(None);
        }

        let text = response.text().await?;
        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(Error::invalid_response("rpc"))?
        };

        Ok(Some(RpcResponse::from_body(data)))
    }
}

/// Serialize keyword arguments, which must form a JSON object
fn kwargs_body<B: Serialize + ?Sized>(kwargs: &B) -> Result<Value> {
    let body = serde_json::to_value(kwargs)?;
    if !body.is_object() {
        return Err(Error::InvalidField {
            field: "kwargs",
            value: body.to_string(),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_flag() {
        assert!(RpcResponse::from_body(json!({ "error": "no such method" })).error);
        assert!(!RpcResponse::from_body(json!({ "result": 3 })).error);
        assert!(!RpcResponse::from_body(json!([1, 2])).error);
        assert!(!RpcResponse::from_body(Value::Null).error);
    }

    #[test]
    fn test_kwargs_must_be_an_object() {
        assert_eq!(kwargs_body(&json!({ "x": 1 })).unwrap(), json!({ "x": 1 }));
        assert_eq!(kwargs_body(&json!({})).unwrap(), json!({}));

        for kwargs in [json!([1, 2]), json!(3), json!("x"), Value::Null] {
            match kwargs_body(&kwargs) {
                Err(Error::InvalidField { field: "kwargs", value }) => {
                    assert_eq!(value, kwargs.to_string())
                }
                other => panic!("unexpected: {:?}", other),
            }
        }
    }
}
