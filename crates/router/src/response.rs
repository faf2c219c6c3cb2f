use serde::{Deserialize, Serialize};

/// Response from a single chat call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterResponse {
    /// Final answer text from the model.
    pub content: String,

    /// Reasoning trace, when the backend returns one separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,

    /// Resolved model string (e.g. "ollama/gpt-oss:20b").
    pub model: String,

    pub prompt_tokens: u64,

    pub completion_tokens: u64,

    /// Roundtrip latency in milliseconds.
    pub latency_ms: u64,
}

impl RouterResponse {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}
