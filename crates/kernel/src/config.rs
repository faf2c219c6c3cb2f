use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::message::Think;

pub const DEFAULT_MODEL: &str = "ollama/gpt-oss:20b";
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Full mazeprobe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Default `provider/model` string for `run`.
    pub model: String,
    pub think: Think,
    /// Directory searched for `<name>.txt` maze files.
    pub maze_dir: PathBuf,
    pub providers: ProvidersConfig,
    pub request: RequestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub ollama: EndpointConfig,
    pub openai: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            think: Think::default(),
            maze_dir: PathBuf::from("mazes"),
            providers: ProvidersConfig {
                ollama: EndpointConfig {
                    base_url: DEFAULT_OLLAMA_URL.into(),
                },
                openai: EndpointConfig {
                    base_url: DEFAULT_OPENAI_URL.into(),
                },
            },
            request: RequestConfig { temperature: None },
        }
    }
}

impl ProbeConfig {
    /// Load config with deep merge: built-in defaults + `<root>/.mazeprobe/config.yaml`.
    pub fn load(root: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(root) = root {
            let override_path = root.join(".mazeprobe").join("config.yaml");
            if override_path.exists() {
                debug!(path = %override_path.display(), "loading config overrides");
                let contents = std::fs::read_to_string(&override_path)
                    .map_err(|e| Error::Config(format!("failed to read config: {e}")))?;

                // A file with only comments parses to Null.
                let overrides: serde_yaml::Value = serde_yaml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("invalid config YAML: {e}")))?;

                if !overrides.is_null() {
                    let base: serde_yaml::Value = serde_yaml::to_value(&config)
                        .map_err(|e| Error::Config(format!("failed to serialize defaults: {e}")))?;

                    let merged = deep_merge(base, overrides);
                    config = serde_yaml::from_value(merged).map_err(|e| {
                        Error::Config(format!("failed to parse merged config: {e}"))
                    })?;
                }
            }

            if config.maze_dir.is_relative() {
                config.maze_dir = root.join(&config.maze_dir);
            }
        }

        Ok(config)
    }

    /// Apply `OLLAMA_HOST` and `OPENAI_BASE_URL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("OLLAMA_HOST").filter(|h| !h.trim().is_empty()) {
            self.providers.ollama.base_url = normalize_host(&host);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.providers.openai.base_url = url.trim().to_string();
        }
    }

    /// Map a `--maze` value to a file.
    ///
    /// Values that look like paths (contain a separator or end in `.txt`)
    /// are used as given; bare names resolve to `<maze_dir>/<name>.txt`.
    pub fn resolve_maze_path(&self, maze: &str) -> PathBuf {
        if maze.contains('/') || maze.contains('\\') || maze.ends_with(".txt") {
            PathBuf::from(maze)
        } else {
            self.maze_dir.join(format!("{maze}.txt"))
        }
    }
}

/// `OLLAMA_HOST` is often given as `host:port` without a scheme.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Recursively merge override into base (override wins on conflict).
fn deep_merge(base: serde_yaml::Value, over: serde_yaml::Value) -> serde_yaml::Value {
    match (base, over) {
        (serde_yaml::Value::Mapping(mut base_map), serde_yaml::Value::Mapping(over_map)) => {
            for (key, over_val) in over_map {
                let merged = if let Some(base_val) = base_map.remove(&key) {
                    deep_merge(base_val, over_val)
                } else {
                    over_val
                };
                base_map.insert(key, merged);
            }
            serde_yaml::Value::Mapping(base_map)
        }
        (_, over) => over,
    }
}
