use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config_manager::stateless_llm::OpenAICompatibleConfig;
use crate::config_manager::system::SystemConfig;

/// Environment variable holding the upstream credential
pub const API_KEY_VAR: &str = "LOVABLE_API_KEY";

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "server_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "llm_config")]
    #[serde(default)]
    pub llm_config: OpenAICompatibleConfig,
}

impl Config {
    /// Load configuration from a JSON-LD, JSON or YAML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_file, validate_config};
        let value = read_config_file(path)?;
        validate_config(value)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.system_config
            .validate()
            .map_err(|e| anyhow::anyhow!("server_config: {}", e))?;
        self.llm_config
            .validate()
            .map_err(|e| anyhow::anyhow!("llm_config: {}", e))?;
        Ok(())
    }

    /// Try the usual config locations in order, falling back to defaults
    /// with the credential taken from the environment.
    pub fn discover() -> anyhow::Result<(Self, Option<String>)> {
        for path in candidate_paths() {
            if !std::path::Path::new(&path).exists() {
                debug!("No config at {}", path);
                continue;
            }
            let mut config = Self::load(&path)?;
            config.fill_api_key_from_env();
            return Ok((config, Some(path)));
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.fill_api_key_from_env();
        config.validate()?;
        Ok((config, None))
    }

    fn fill_api_key_from_env(&mut self) {
        if self.llm_config.has_api_key() {
            return;
        }
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => {
                debug!("Using upstream key from {}", API_KEY_VAR);
                self.llm_config.llm_api_key = key;
            }
            _ => warn!("{} is not set", API_KEY_VAR),
        }
    }
}

fn candidate_paths() -> Vec<String> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut paths: Vec<String> = std::env::var("CONFIG_PATH").ok().into_iter().collect();
    for name in ["conf.jsonld", "conf.yaml"] {
        paths.push(name.to_string());
        if let Some(p) = exe_dir.join(name).to_str() {
            paths.push(p.to_string());
        }
    }
    paths.dedup();
    paths
}
