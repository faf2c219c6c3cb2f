use std::time::Instant;

use mazeprobe_kernel::message::{Message, Think};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Provider, ProviderError, ProviderFuture, retry_after_ms};
use crate::response::RouterResponse;

/// Name given to the response schema in `response_format`.
const SCHEMA_NAME: &str = "move_reply";

/// Any `/v1/chat/completions` endpoint (OpenAI, vLLM, llama.cpp, LM Studio).
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    provider_name: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, provider_name: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            provider_name,
        }
    }

    /// Build from `OPENAI_API_KEY`, posting to `base_url`.
    pub fn from_env(base_url: &str) -> Result<Self, ProviderError> {
        let key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ProviderError::MissingApiKey("OPENAI_API_KEY".into()))?;
        Ok(Self::new(key, base_url.into(), "openai".into()))
    }
}

impl Provider for OpenAiProvider {
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
        let response_format = format.map(json_schema_format);

        Box::pin(async move {
            let body = OaiRequest {
                model: &model,
                messages: &messages,
                temperature,
                reasoning_effort: reasoning_effort(think),
                response_format: response_format.as_ref(),
            };

            debug!(url = %self.base_url, model = %model, "openai: sending chat");

            let start = Instant::now();

            let resp = self
                .client
                .post(&self.base_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await?;

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

            let parsed: OaiResponse = serde_json::from_str(&resp_text)
                .map_err(|e| ProviderError::Parse(format!("{e}: {resp_text}")))?;

            let choice = parsed
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Parse("no choices in response".into()))?;

            let usage = parsed.usage.unwrap_or_default();

            Ok(RouterResponse {
                content: choice.message.content.unwrap_or_default(),
                thinking: choice
                    .message
                    .reasoning_content
                    .filter(|t| !t.trim().is_empty()),
                model: format!("{}/{model}", self.provider_name),
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                latency_ms,
            })
        })
    }
}

/// Wrap a bare JSON schema in OpenAI's `response_format` envelope.
fn json_schema_format(schema: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": schema,
        }
    })
}

/// Only explicit levels map onto `reasoning_effort`; booleans leave the
/// server default in place.
fn reasoning_effort(think: Think) -> Option<&'static str> {
    match think {
        Think::Level(level) => Some(level.as_str()),
        Think::Enabled(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OaiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a serde_json::Value>,
}

#[derive(Deserialize)]
struct OaiResponse {
    choices: Vec<OaiChoice>,
    #[serde(default)]
    usage: Option<OaiUsage>,
}

#[derive(Deserialize)]
struct OaiChoice {
    message: OaiChoiceMessage,
}

#[derive(Deserialize)]
struct OaiChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

#[derive(Deserialize, Default)]
struct OaiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
