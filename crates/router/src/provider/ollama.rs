use std::time::Instant;

use mazeprobe_kernel::config::DEFAULT_OLLAMA_URL;
use mazeprobe_kernel::message::{Message, Think};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Provider, ProviderError, ProviderFuture, retry_after_ms};
use crate::response::RouterResponse;

/// Ollama's native `/api/chat` endpoint.
///
/// Unlike the OpenAI-compatible route this one accepts `think` and a JSON
/// schema in `format`, and returns the reasoning trace separately.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL)
    }
}

impl Provider for OllamaProvider {
    fn chat(
        &self,
        model: &str,
        messages: &[Message],
        think: Think,
        temperature: Option<f32>,
        format: Option<&serde_json::Value>,
    ) -> ProviderFuture<'_> {
        let model = model.to_string();
        let messages = messages.to_vec();
        let format = format.cloned();

        Box::pin(async move {
            let body = OllamaRequest {
                model: &model,
                messages: &messages,
                stream: false,
                think,
                format: format.as_ref(),
                options: temperature.map(|temperature| OllamaOptions { temperature }),
            };

            let url = self.chat_url();
            debug!(url = %url, model = %model, think = %think, "ollama: sending chat");

            let start = Instant::now();
            let resp = self.client.post(&url).json(&body).send().await?;

            let latency_ms = start.elapsed().as_millis() as u64;
            let status = resp.status().as_u16();

            if status == 429 {
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_after_ms(resp.headers()),
                });
            }

            let resp_text = resp.text().await?;

            if status >= 400 {
                return Err(ProviderError::Api {
                    status,
                    body: resp_text,
                });
            }

            let parsed: OllamaResponse = serde_json::from_str(&resp_text)
                .map_err(|e| ProviderError::Parse(format!("{e}: {resp_text}")))?;

            if let Some(err) = parsed.error {
                return Err(ProviderError::Api { status, body: err });
            }

            let message = parsed
                .message
                .ok_or_else(|| ProviderError::Parse("no message in response".into()))?;

            Ok(RouterResponse {
                content: message.content,
                thinking: message.thinking.filter(|t| !t.trim().is_empty()),
                model: format!("ollama/{model}"),
                prompt_tokens: parsed.prompt_eval_count,
                completion_tokens: parsed.eval_count,
                latency_ms,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    think: Think,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    thinking: Option<String>,
}
