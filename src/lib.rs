pub mod api;
pub mod error;
pub mod format;
pub mod logging;
pub mod notifier;
pub mod settings;
pub mod signature;
pub mod ui;
pub mod webhook;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{RelayError, Result};
use crate::notifier::TelegramNotifier;

/// Contents of the relay config file: one table per project.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RelayConfig {
    #[serde(default)]
    pub project: HashMap<String, ProjectConfig>,
}

impl RelayConfig {
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        self.project.get(name)
    }
}

/// Telegram chat target: numeric id or `@channelusername`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Text(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Text(name) => f.write_str(name),
        }
    }
}

/// How a project's webhook deliveries are authenticated.
#[derive(Clone, PartialEq)]
pub enum SignaturePolicy {
    /// No secret configured; deliveries are accepted unsigned.
    Unverified,
    /// Deliveries must carry a valid `X-Hub-Signature-256` for this secret.
    Verified(String),
    /// `with_webhook_secret` is set but the secret is missing or empty.
    SecretMissing,
}

impl fmt::Debug for SignaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignaturePolicy::Unverified => f.write_str("Unverified"),
            SignaturePolicy::Verified(_) => f.write_str("Verified(<redacted>)"),
            SignaturePolicy::SecretMissing => f.write_str("SecretMissing"),
        }
    }
}

/// Per-project settings as written in the config file.
#[derive(Deserialize)]
struct ProjectEntry {
    bot_token: String,
    chat_id: ChatId,
    thread_id: Option<i64>,
    webhook_secret: Option<String>,
    with_webhook_secret: Option<bool>,
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(from = "ProjectEntry")]
pub struct ProjectConfig {
    pub bot_token: String,
    pub chat_id: ChatId,
    pub thread_id: Option<i64>,
    pub signature: SignaturePolicy,
}

impl From<ProjectEntry> for ProjectConfig {
    fn from(entry: ProjectEntry) -> Self {
        let secret = entry.webhook_secret.filter(|s| !s.is_empty());
        let signature = match (secret, entry.with_webhook_secret.unwrap_or(false)) {
            (Some(secret), _) => SignaturePolicy::Verified(secret),
            (None, true) => SignaturePolicy::SecretMissing,
            (None, false) => SignaturePolicy::Unverified,
        };
        Self {
            bot_token: entry.bot_token,
            chat_id: entry.chat_id,
            thread_id: entry.thread_id,
            signature,
        }
    }
}

impl fmt::Debug for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("thread_id", &self.thread_id)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Load and parse the configuration file
pub fn load_config(path: &Path) -> Result<RelayConfig> {
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        RelayError::ConfigError(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;

    let config: RelayConfig = toml::from_str(&config_str).map_err(|e| {
        RelayError::ConfigError(format!("Failed to parse config file '{}': {}", path.display(), e))
    })?;

    Ok(config)
}

/// Loads the config, degrading to an empty project map on any failure so the
/// server still starts (every webhook then answers 404).
pub fn load_config_or_empty(path: &Path) -> RelayConfig {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; starting with no projects configured", e);
            return RelayConfig::default();
        }
    };

    for (name, project) in &config.project {
        match project.signature {
            SignaturePolicy::Verified(_) => {}
            SignaturePolicy::Unverified => warn!(
                "Project '{}' has no webhook secret; signatures will not be verified",
                name
            ),
            SignaturePolicy::SecretMissing => error!(
                "Project '{}' requires a webhook secret, but none was configured",
                name
            ),
        }
    }
    info!(
        "Loaded {} project(s) from {}",
        config.project.len(),
        path.display()
    );
    config
}

pub struct AppState {
    pub config: RelayConfig,
    pub notifier: TelegramNotifier,
}

pub type SharedState = Arc<AppState>;
