use std::sync::Arc;

use crate::config_manager::Config;
use crate::llm::{OpenAICompatibleLLM, StatelessLLMInterface};

/// Shared, read-only handler state. Requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn StatelessLLMInterface>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = OpenAICompatibleLLM::new(&config.llm_config)?;
        Ok(Self::with_llm(config, Arc::new(llm)))
    }

    pub fn with_llm(config: Config, llm: Arc<dyn StatelessLLMInterface>) -> Self {
        Self {
            config: Arc::new(config),
            llm,
        }
    }

    pub fn max_text_chars(&self) -> usize {
        self.config.system_config.max_text_chars
    }
}
