//! Agent configuration
//!
//! The configuration sub-resource of an agent: its enabled flag and start
//! priority, and the link to its RPC surface.

use super::client::VuiClient;
use super::error::{Error, Result};
use super::http::RequestOptions;
use super::links::{Links, Resource};
use super::rpc::AgentRpc;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Priority used when enabling an agent without an explicit one
pub const DEFAULT_PRIORITY: i32 = 50;

/// Enabled flag and start priority of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentEnabled {
    pub enabled: bool,
    pub priority: Option<i32>,
}

/// Raw body of the `enabled` resource
#[derive(Debug, Deserialize)]
struct EnabledRecord {
    status: String,
    #[serde(default)]
    priority: Value,
}

impl EnabledRecord {
    fn interpret(&self) -> Result<AgentEnabled> {
        Ok(AgentEnabled {
            enabled: parse_status_flag(&self.status),
            priority: parse_priority(&self.priority)?,
        })
    }
}

/// Interpret a `"true"`/`"false"` string case-insensitively.
/// Anything else reads as `false`.
pub fn parse_status_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Interpret a priority field: an integer, an integer string, or
/// `"None"`/null for no priority
pub fn parse_priority(raw: &Value) -> Result<Option<i32>> {
    let invalid = || Error::InvalidField {
        field: "priority",
        value: raw.to_string(),
    };

    match raw {
        Value::Null => Ok(None),
        Value::String(s) if s == "None" => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Configuration sub-resource of one agent
#[derive(Clone, Serialize)]
pub struct Configs {
    #[serde(skip)]
    client: VuiClient,
    pub identity: String,
    pub links: Links,
}

impl fmt::Debug for Configs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configs")
            .field("identity", &self.identity)
            .field("links", &self.links)
            .finish()
    }
}

impl Resource for Configs {
    fn describe(&self) -> String {
        format!("configs of agent {}", self.identity)
    }

    fn links(&self) -> &Links {
        &self.links
    }
}

impl Configs {
    pub(crate) fn new(client: VuiClient, identity: impl Into<String>, links: Links) -> Self {
        Self {
            client,
            identity: identity.into(),
            links,
        }
    }

    async fn enabled_record(&self) -> Result<EnabledRecord> {
        let link = self.link("enabled")?;
        self.client
            .get_json(&link.url, RequestOptions::new(), "enabled")
            .await
    }

    /// Fetch whether the agent is enabled and at which priority
    pub async fn enabled(&self) -> Result<AgentEnabled> {
        self.enabled_record().await?.interpret()
    }

    /// Fetch the status flag of the `enabled` resource
    pub async fn running(&self) -> Result<bool> {
        Ok(parse_status_flag(&self.enabled_record().await?.status))
    }

    /// Enable the agent at `priority` (default 50), or disable it.
    ///
    /// Enabling PUTs the `enabled` link, disabling DELETEs it. The response
    /// is returned unvalidated; re-fetch to observe the new state.
    pub async fn set_enabled(&self, enabled: bool, priority: Option<i32>) -> Result<Response> {
        let link = self.link("enabled")?;

        if enabled {
            let priority = priority.unwrap_or(DEFAULT_PRIORITY);
            tracing::info!("Enabling {} at priority {}", self.identity, priority);
            self.client
                .put(&link.url, RequestOptions::new().query("priority", priority))
                .await
        } else {
            tracing::info!("Disabling {}", self.identity);
            self.client.delete(&link.url, RequestOptions::new()).await
        }
    }

    /// Change the start priority. The server enables the agent at the new priority.
    pub async fn set_priority(&self, priority: i32) -> Result<Response> {
        self.set_enabled(true, Some(priority)).await
    }

    /// Follow the `rpc` link to the agent's invocable functions
    pub async fn rpc(&self) -> Result<AgentRpc> {
        let link = self.link("rpc")?;
        let links = self
            .client
            .get_links(&link.url, RequestOptions::new(), "rpc")
            .await?;
        Ok(AgentRpc::new(self.client.clone(), self.identity.clone(), links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_flag_is_case_insensitive() {
        assert!(parse_status_flag("true"));
        assert!(parse_status_flag("TRUE"));
        assert!(!parse_status_flag("FALSE"));
        assert!(!parse_status_flag("yes"));
        assert!(!parse_status_flag(""));
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority(&json!("None")).unwrap(), None);
        assert_eq!(parse_priority(&Value::Null).unwrap(), None);
        assert_eq!(parse_priority(&json!("7")).unwrap(), Some(7));
        assert_eq!(parse_priority(&json!(50)).unwrap(), Some(50));
        assert!(parse_priority(&json!("high")).is_err());
        assert!(parse_priority(&json!([1])).is_err());
    }

    #[test]
    fn test_enabled_record_interpretation() {
        let record: EnabledRecord =
            serde_json::from_value(json!({ "status": "True", "priority": "None" })).unwrap();
        assert_eq!(
            record.interpret().unwrap(),
            AgentEnabled {
                enabled: true,
                priority: None
            }
        );
    }
}
