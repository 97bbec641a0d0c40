//! Inbound request shape shared by chat and summary turns.

use serde::{Deserialize, Serialize};

/// A message as received from the caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

impl RawMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
        }
    }
}

/// Conversation history plus persona selector.
///
/// Summary turns only read `language`; chat turns need all three selectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeRequest {
    #[serde(default)]
    pub messages: Vec<RawMessage>,

    /// Older clients send this field as `disease`.
    #[serde(default, alias = "disease")]
    pub condition: String,

    /// Audience: `patient` or `carer`
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub language: String,
}
