//! Configuration Management
//!
//! Handles persistent configuration storage for the `vui` CLI.

use crate::vui::auth::DEFAULT_AUTH_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration. Passwords are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Authentication endpoint
    #[serde(default)]
    pub auth_url: Option<String>,
    /// Base URL override for API links
    #[serde(default)]
    pub vui_url: Option<String>,
    /// Last used username
    #[serde(default)]
    pub username: Option<String>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vui-client").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective auth URL (config > VUI_AUTH_URL > local default)
    pub fn effective_auth_url(&self) -> String {
        self.auth_url
            .clone()
            .or_else(|| env_var("VUI_AUTH_URL"))
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
    }

    /// Get effective base URL override (config > VUI_URL)
    pub fn effective_vui_url(&self) -> Option<String> {
        self.vui_url.clone().or_else(|| env_var("VUI_URL"))
    }

    /// Get effective username (config > VUI_USERNAME)
    pub fn effective_username(&self) -> Option<String> {
        self.username.clone().or_else(|| env_var("VUI_USERNAME"))
    }
}
