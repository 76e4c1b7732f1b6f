//! Push event payload structures and validation

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RelayError, Result};

pub const EVENT_HEADER: &str = "X-GitHub-Event";
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// Top-level fields a push payload must carry (non-null).
const REQUIRED_FIELDS: [&str; 3] = ["pusher", "repository", "commits"];

/// The subset of a GitHub push event needed to render a notification.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PushEvent {
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
    pub pusher: Pusher,
    pub repository: Repository,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pusher {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub url: String,
    pub author: Option<CommitAuthor>,
    pub added: Option<Vec<String>>,
    pub modified: Option<Vec<String>>,
    pub removed: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommitAuthor {
    pub name: Option<String>,
}

impl PushEvent {
    /// Branch name with the `refs/heads/` prefix removed, if the ref is a branch.
    pub fn branch(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .and_then(|r| r.strip_prefix("refs/heads/"))
    }
}

/// Parses the raw body and checks that `pusher`, `repository` and `commits`
/// are present and non-null before building a [`PushEvent`].
///
/// Nested fields are not validated here; missing ones fall back to defaults.
pub fn parse_push_event(body: &[u8]) -> Result<PushEvent> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    validate_push_payload(&payload)?;

    serde_json::from_value(payload)
        .map_err(|e| RelayError::MalformedPayload(format!("unexpected payload shape: {}", e)))
}

/// Structural check on an already-parsed payload.
pub fn validate_push_payload(payload: &Value) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| payload.get(field).is_none_or(Value::is_null))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RelayError::MalformedPayload(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}
