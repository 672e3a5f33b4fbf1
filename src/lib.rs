//! Client for the VOLTTRON web UI (VUI) API.
//!
//! The API is hypermedia driven: apart from the login endpoint and the
//! platform collection, every URL the client requests comes from a link map
//! in a previous response.

pub mod config;
pub mod vui;

pub use vui::agents::{Agent, AgentStatus};
pub use vui::auth::{authenticate, Session};
pub use vui::client::VuiClient;
pub use vui::configs::{AgentEnabled, Configs};
pub use vui::error::{Error, Result};
pub use vui::http::RequestOptions;
pub use vui::links::{build_links, Link, Links, Resource};
pub use vui::platforms::{Platform, Platforms};
pub use vui::rpc::{AgentRpc, RpcResponse};
