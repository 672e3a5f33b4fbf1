//! VUI Platforms
//!
//! The platform collection is the root of the navigation tree. Everything
//! below it is reached through the link maps the server returns.

use super::agents::{Agent, AgentStatus, StatusRecord};
use super::client::VuiClient;
use super::error::{Error, Result};
use super::http::{read_json, RequestOptions};
use super::links::{parse_links, Links, Resource};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Path of the platform collection
pub const PLATFORMS_PATH: &str = "/vui/platforms";

/// Path of a single platform
pub fn platform_path(name: &str) -> String {
    format!("{}/{}", PLATFORMS_PATH, urlencoding::encode(name))
}

/// Path of an agent on a platform
pub fn agent_path(platform: &str, identity: &str) -> String {
    format!(
        "{}/agents/{}",
        platform_path(platform),
        urlencoding::encode(identity)
    )
}

/// The platform collection
#[derive(Clone, Debug)]
pub struct Platforms {
    client: VuiClient,
}

impl Platforms {
    pub(crate) fn new(client: VuiClient) -> Self {
        Self { client }
    }

    /// List every platform along with its link map.
    ///
    /// An unsuccessful collection response yields an empty list, and
    /// platforms whose own resource cannot be fetched are skipped.
    pub async fn list(&self) -> Result<Vec<Platform>> {
        let response = self.client.get(PLATFORMS_PATH, RequestOptions::new()).await?;
        if !response.status().is_success() {
            tracing::warn!("Listing platforms failed: {}", response.status());
            return Ok(Vec::new());
        }

        let body: Value = read_json(response, "platform collection").await?;
        let roots = parse_links(body, "platform collection")?;

        let mut platforms = Vec::with_capacity(roots.len());
        for root in roots {
            let response = self.client.get(&root.url, RequestOptions::new()).await?;
            if !response.status().is_success() {
                tracing::warn!("Skipping platform {}: {}", root.key, response.status());
                continue;
            }

            let links = read_json::<Value>(response, "platform")
                .await
                .and_then(|body| parse_links(body, "platform"));
            match links {
                Ok(links) => platforms.push(Platform::new(self.client.clone(), root.key, links)),
                Err(e) => tracing::warn!("Skipping platform {}: {}", root.key, e),
            }
        }

        tracing::debug!("Loaded {} platforms", platforms.len());
        Ok(platforms)
    }

    /// Fetch one platform by name
    pub async fn get_platform(&self, name: &str) -> Result<Platform> {
        let response = self
            .client
            .get(&platform_path(name), RequestOptions::new())
            .await?;
        if !response.status().is_success() {
            return Err(Error::InvalidPlatformReference(name.to_string()));
        }

        let body: Value = read_json(response, "platform").await?;
        let links = parse_links(body, "platform")?;
        Ok(Platform::new(self.client.clone(), name, links))
    }
}

/// One managed platform
#[derive(Clone, Serialize)]
pub struct Platform {
    #[serde(skip)]
    client: VuiClient,
    pub name: String,
    pub links: Links,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.name)
            .field("links", &self.links)
            .finish()
    }
}

impl Resource for Platform {
    fn describe(&self) -> String {
        format!("platform {}", self.name)
    }

    fn links(&self) -> &Links {
        &self.links
    }
}

impl Platform {
    pub(crate) fn new(client: VuiClient, name: impl Into<String>, links: Links) -> Self {
        Self {
            client,
            name: name.into(),
            links,
        }
    }

    /// Installed agents, found through the `agents` link.
    /// An unsuccessful response yields an empty list.
    pub async fn agents(&self) -> Result<Vec<Agent>> {
        let link = self.link("agents")?;
        let response = self
            .client
            .get(
                &link.url,
                RequestOptions::new().query("agent-state", "installed"),
            )
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Listing agents of {} failed: {}", self.name, response.status());
            return Ok(Vec::new());
        }

        let body: Value = read_json(response, "agent collection").await?;
        let links = parse_links(body, "agent collection")?;

        Ok(links
            .into_iter()
            .map(|link| Agent::new(self.client.clone(), self.name.clone(), link.key, link.url))
            .collect())
    }

    /// Look up an agent by VIP identity
    pub async fn get_agent(&self, identity: &str) -> Result<Agent> {
        let path = agent_path(&self.name, identity);
        let response = self.client.get(&path, RequestOptions::new()).await?;
        if !response.status().is_success() {
            return Err(Error::InvalidAgentReference {
                platform: self.name.clone(),
                identity: identity.to_string(),
            });
        }

        Ok(Agent::new(self.client.clone(), self.name.clone(), identity, path))
    }

    /// Status of every agent, found through the `status` link
    pub async fn status(&self) -> Result<Vec<AgentStatus>> {
        let link = self.link("status")?;
        let records: BTreeMap<String, StatusRecord> = self
            .client
            .get_json(&link.url, RequestOptions::new(), "platform status")
            .await?;

        Ok(records
            .into_iter()
            .map(|(identity, record)| record.into_status(&identity, &self.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_encoded() {
        assert_eq!(platform_path("p1"), "/vui/platforms/p1");
        assert_eq!(platform_path("my platform"), "/vui/platforms/my%20platform");
        assert_eq!(
            agent_path("p1", "platform.historian"),
            "/vui/platforms/p1/agents/platform.historian"
        );
    }
}
