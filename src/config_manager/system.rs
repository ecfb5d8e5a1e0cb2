use serde::{Deserialize, Serialize};

use crate::translate::MAX_TEXT_CHARS;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Longest accepted source text, counted in characters.
    #[serde(rename = "max_text_chars")]
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

pub fn default_max_text_chars() -> usize {
    MAX_TEXT_CHARS
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be between 1 and 65535".to_string());
        }
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_text_chars: default_max_text_chars(),
        }
    }
}
