//! VUI Agents
//!
//! Agents installed on a platform and their status records.

use super::client::VuiClient;
use super::configs::{parse_priority, Configs};
use super::error::Result;
use super::http::RequestOptions;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Status of one agent on a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStatus {
    pub identity: String,
    pub platform: String,
    pub name: String,
    pub uuid: Uuid,
    pub exit_code: Option<i32>,
    pub priority: Option<i32>,
    pub running: bool,
    pub enabled: bool,
    pub tag: Option<String>,
    pub pid: Option<u32>,
}

/// Status record as served by the API
#[derive(Debug, Deserialize)]
pub(crate) struct StatusRecord {
    name: String,
    uuid: Uuid,
    #[serde(default)]
    exit_code: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_priority")]
    priority: Option<i32>,
    #[serde(default)]
    running: bool,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    pid: Option<u32>,
}

fn deserialize_priority<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    parse_priority(&raw).map_err(serde::de::Error::custom)
}

impl StatusRecord {
    pub(crate) fn into_status(self, identity: &str, platform: &str) -> AgentStatus {
        AgentStatus {
            identity: identity.to_string(),
            platform: platform.to_string(),
            name: self.name,
            uuid: self.uuid,
            exit_code: self.exit_code,
            priority: self.priority,
            running: self.running,
            enabled: self.enabled,
            tag: self.tag,
            pid: self.pid,
        }
    }
}

/// One installed agent
#[derive(Clone, Serialize)]
pub struct Agent {
    #[serde(skip)]
    client: VuiClient,
    pub platform: String,
    pub identity: String,
    /// Self link
    pub link: String,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("platform", &self.platform)
            .field("identity", &self.identity)
            .field("link", &self.link)
            .finish()
    }
}

impl Agent {
    pub(crate) fn new(
        client: VuiClient,
        platform: impl Into<String>,
        identity: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            client,
            platform: platform.into(),
            identity: identity.into(),
            link: link.into(),
        }
    }

    /// Follow the self link to the agent's configuration resource
    pub async fn configs(&self) -> Result<Configs> {
        let links = self
            .client
            .get_links(&self.link, RequestOptions::new(), "agent")
            .await?;
        Ok(Configs::new(self.client.clone(), self.identity.clone(), links))
    }

    /// Fetch the status record under the agent's `status` sub-path
    pub async fn status(&self) -> Result<AgentStatus> {
        let url = format!("{}/status", self.link.trim_end_matches('/'));
        let record: StatusRecord = self
            .client
            .get_json(&url, RequestOptions::new(), "agent status")
            .await?;
        Ok(record.into_status(&self.identity, &self.platform))
    }
}
