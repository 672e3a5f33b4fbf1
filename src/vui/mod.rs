//! VUI API interaction module
//!
//! This module provides the client for the VOLTTRON web UI API. After
//! authenticating, every resource is reached by following the hypermedia
//! links the server embeds in its responses.
//!
//! # Module Structure
//!
//! - [`auth`] - Token exchange and base URL derivation
//! - [`client`] - Main client holding the session, request verbs
//! - [`http`] - HTTP utilities for REST API calls
//! - [`links`] - Link map extraction and the [`links::Resource`] trait
//! - [`platforms`] - Platform collection and platforms
//! - [`agents`] - Agents and their status records
//! - [`configs`] - Agent configuration: enabled flag and priority
//! - [`rpc`] - Agent RPC functions
//!
//! # Example
//!
//! ```no_run
//! use vui_client::vui::client::VuiClient;
//!
//! async fn example() -> vui_client::vui::error::Result<()> {
//!     let client = VuiClient::new("http://localhost:8070/authenticate")?;
//!     client.authenticate("admin", "admin").await?;
//!
//!     for platform in client.platforms().await?.list().await? {
//!         for agent in platform.agents().await? {
//!             let enabled = agent.configs().await?.enabled().await?;
//!             println!("{}/{}: {:?}", platform.name, agent.identity, enabled);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod auth;
pub mod client;
pub mod configs;
pub mod error;
pub mod http;
pub mod links;
pub mod platforms;
pub mod rpc;
