use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::error::ClientError;
use crate::translate::{TranslationRequest, TranslationResponse};

/// Longer than the proxy's own upstream timeout so the proxy's 502 wins
const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// Whatever carries a translation request to the proxy
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, request: TranslationRequest) -> Result<String, ClientError>;
}

/// HTTP client for the proxy's translate endpoint
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    /// `base_url` is the proxy root, e.g. `http://localhost:8787`
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/translate", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TranslationService for ProxyClient {
    async fn translate(&self, request: TranslationRequest) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Transport)?;
        debug!("Proxy answered {} with {} bytes", status, body.len());

        match serde_json::from_str::<TranslationResponse>(&body) {
            Ok(TranslationResponse::Success { translated_text }) if status.is_success() => {
                Ok(translated_text)
            }
            Ok(TranslationResponse::Failure { error }) => Err(ClientError::Server(error)),
            Ok(TranslationResponse::Success { .. }) | Err(_) => {
                warn!("Unexpected proxy response: status={}", status);
                Err(ClientError::Unexpected(format!("proxy returned status {}", status)))
            }
        }
    }
}
