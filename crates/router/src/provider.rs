pub mod ollama;
pub mod openai;

use std::future::Future;
use std::pin::Pin;

use mazeprobe_kernel::message::{Message, Think};

use crate::response::RouterResponse;

/// Boxed future returned by Provider methods (for dyn compatibility).
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RouterResponse, ProviderError>> + Send + 'a>>;

/// Provider used when a model string carries no `provider/` prefix.
pub const DEFAULT_PROVIDER: &str = "ollama";

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A provider handles the actual HTTP call to a chat API.
///
/// Each provider translates the generic `Message` list, think setting and
/// response schema into its own request shape and parses the reply back.
pub trait Provider: Send + Sync {
    /// Make a single non-streaming chat call.
    fn chat(
        &self,
        model: &str,
        messages: &[Message],
        think: Think,
        temperature: Option<f32>,
        format: Option<&serde_json::Value>,
    ) -> ProviderFuture<'_>;
}

/// Errors from a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("missing API key: {0}")]
    MissingApiKey(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("rate limited, retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },
}

/// Read a `Retry-After` header given in whole seconds.
pub(crate) fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|s| s * 1000)
}

// ---------------------------------------------------------------------------
// Provider resolution from model string
// ---------------------------------------------------------------------------

/// Parse a model string like "ollama/gpt-oss:20b" into
/// (provider_name, model_id).
pub fn parse_model_string(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((provider, model_id)) => (provider, model_id),
        None => (DEFAULT_PROVIDER, model),
    }
}
