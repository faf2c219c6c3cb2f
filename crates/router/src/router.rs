use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mazeprobe_kernel::config::ProbeConfig;
use mazeprobe_kernel::message::{Message, Think};
use tracing::{info, warn};

use crate::provider::ollama::OllamaProvider;
use crate::provider::openai::OpenAiProvider;
use crate::provider::{Provider, ProviderError, parse_model_string};
use crate::response::RouterResponse;

const MAX_ATTEMPTS: u64 = 3;

/// Errors from routing a chat call.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("provider `{provider}` not available for model `{model}` (missing API key?)")]
    ProviderUnavailable { provider: String, model: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("exhausted retries after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u64, last: String },
}

// ---------------------------------------------------------------------------
// Router: resolves `provider/model` strings, retries rate limits
// ---------------------------------------------------------------------------

pub struct Router {
    /// Provider name → provider instance.
    providers: HashMap<String, Arc<dyn Provider>>,

    temperature: Option<f32>,

    /// Base delay for linear backoff between attempts.
    backoff_ms: u64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// An empty router with no providers.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            temperature: None,
            backoff_ms: 1000,
        }
    }

    /// Build the standard providers from config.
    ///
    /// Ollama is always registered. The `openai` provider is only present
    /// when `OPENAI_API_KEY` is set; asking for it otherwise fails at call
    /// time, not here.
    pub fn from_config(config: &ProbeConfig) -> Self {
        let mut router = Self::new();
        router.temperature = config.request.temperature;
        router.register_provider(
            "ollama".into(),
            Arc::new(OllamaProvider::new(config.providers.ollama.base_url.as_str())),
        );
        if let Ok(p) = OpenAiProvider::from_env(&config.providers.openai.base_url) {
            router.register_provider("openai".into(), Arc::new(p));
        }
        router
    }

    /// Register a custom provider (e.g. a second Ollama host).
    pub fn register_provider(&mut self, name: String, provider: Arc<dyn Provider>) {
        self.providers.insert(name, provider);
    }

    pub fn with_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Pre-flight check: fail before any prompt work if `model` names a
    /// provider that is not registered.
    pub fn preflight_check(&self, model: &str) -> Result<(), RouterError> {
        self.resolve(model).map(|_| ())
    }

    fn resolve<'m>(&self, model: &'m str) -> Result<(&Arc<dyn Provider>, &'m str), RouterError> {
        let (provider_name, model_id) = parse_model_string(model);
        let provider =
            self.providers
                .get(provider_name)
                .ok_or_else(|| RouterError::ProviderUnavailable {
                    provider: provider_name.into(),
                    model: model.into(),
                })?;
        Ok((provider, model_id))
    }

    /// Make a chat call for a `provider/model` string.
    ///
    /// Retries rate limits up to three attempts with linear backoff (or the
    /// server's `Retry-After`). Transport and API errors are returned
    /// immediately.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        think: Think,
        format: Option<&serde_json::Value>,
    ) -> Result<RouterResponse, RouterError> {
        let (provider, model_id) = self.resolve(model)?;

        info!(model, think = %think, "router: calling model");

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match provider
                .chat(model_id, messages, think, self.temperature, format)
                .await
            {
                Ok(response) => {
                    info!(
                        model = %response.model,
                        prompt_tokens = response.prompt_tokens,
                        completion_tokens = response.completion_tokens,
                        latency_ms = response.latency_ms,
                        thinking = response.thinking.is_some(),
                        "router: call complete"
                    );
                    return Ok(response);
                }
                Err(ProviderError::RateLimited { retry_after_ms }) => {
                    last_err = Some(format!("rate limited on attempt {attempt}"));
                    if attempt < MAX_ATTEMPTS {
                        let wait = retry_after_ms.unwrap_or(self.backoff_ms * attempt);
                        warn!(model, attempt, wait_ms = wait, "router: rate limited, retrying");
                        tokio::time::sleep(Duration::from_millis(wait)).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RouterError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
            last: last_err.unwrap_or_else(|| "unknown".into()),
        })
    }
}
