use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the OpenAI-compatible chat-completion provider
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleConfig {
    #[serde(rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(rename = "llm_api_key")]
    #[serde(default)]
    pub llm_api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a connection failure. At most one is honoured.
    #[serde(rename = "max_retries")]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash-lite".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

impl OpenAICompatibleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            ));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retries(&self) -> u32 {
        self.max_retries.min(1)
    }

    pub fn has_api_key(&self) -> bool {
        !self.llm_api_key.trim().is_empty() && !self.llm_api_key.starts_with("${")
    }
}

// Keeps the credential out of logs
impl fmt::Debug for OpenAICompatibleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompatibleConfig")
            .field("base_url", &self.base_url)
            .field("llm_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for OpenAICompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            llm_api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}
