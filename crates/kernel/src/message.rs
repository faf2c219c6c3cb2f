use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message types for chat calls
// ---------------------------------------------------------------------------

/// A chat message for LLM completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Standard chat roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

// ---------------------------------------------------------------------------
// Reasoning setting passed through to the model backend
// ---------------------------------------------------------------------------

/// Reasoning effort requested from the model.
///
/// Serializes the way Ollama's `think` field expects it: a bare boolean or
/// one of the level strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Think {
    Enabled(bool),
    Level(ThinkLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkLevel {
    Low,
    Medium,
    High,
}

impl ThinkLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ThinkLevel::Low => "low",
            ThinkLevel::Medium => "medium",
            ThinkLevel::High => "high",
        }
    }
}

impl Default for Think {
    fn default() -> Self {
        Think::Enabled(true)
    }
}

impl fmt::Display for Think {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Think::Enabled(b) => write!(f, "{b}"),
            Think::Level(level) => f.write_str(level.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid think setting `{0}` (expected true, false, low, medium or high)")]
pub struct ThinkSyntaxError(pub String);

impl FromStr for Think {
    type Err = ThinkSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Think::Enabled(true)),
            "false" => Ok(Think::Enabled(false)),
            "low" => Ok(Think::Level(ThinkLevel::Low)),
            "medium" => Ok(Think::Level(ThinkLevel::Medium)),
            "high" => Ok(Think::Level(ThinkLevel::High)),
            _ => Err(ThinkSyntaxError(s.to_string())),
        }
    }
}
