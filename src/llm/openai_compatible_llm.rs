use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::stateless_llm_interface::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, StatelessLLMInterface,
    UpstreamError,
};
use crate::config_manager::OpenAICompatibleConfig;

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// OpenAI compatible LLM implementation.
/// Talks to `{base_url}/chat/completions` with a bearer credential.
pub struct OpenAICompatibleLLM {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    retries: u32,
}

impl OpenAICompatibleLLM {
    pub fn new(config: &OpenAICompatibleConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        info!(
            "Initialized OpenAICompatibleLLM: model={}, endpoint={}, timeout={}s",
            config.model, endpoint, config.timeout_secs
        );
        Ok(Self {
            client,
            endpoint,
            api_key: config.llm_api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            retries: config.retries(),
        })
    }

    async fn send_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
    }

    /// Only connection failures are retried: the request never reached the
    /// upstream, so repeating it cannot double any work.
    async fn send_with_retry(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_timeout() => return Err(UpstreamError::Timeout),
                Err(e) if e.is_connect() && attempt < self.retries => {
                    attempt += 1;
                    warn!("Upstream connection failed ({}), retry {}", e, attempt);
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(UpstreamError::Transport(e)),
            }
        }
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
        };

        let response = self.send_with_retry(&request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Transport(e)
            }
        })?;
        debug!("Upstream replied with {} bytes", body.len());
        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
