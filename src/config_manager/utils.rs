use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("static pattern"))
}

/// Replace `${VAR_NAME}` placeholders with values from the environment.
/// Unset variables are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    substitute_with(content, |name| std::env::var(name).ok())
}

pub(crate) fn substitute_with<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Read a configuration file, substitute environment variables and parse it
/// as JSON-LD/JSON or YAML depending on the extension.
pub fn read_config_file(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }
    let content = substitute_env_vars(&content);

    parse_config_text(config_path, &content)
}

pub(crate) fn parse_config_text(config_path: &str, content: &str) -> Result<Value> {
    let path_lower = config_path.to_lowercase();
    let mut value: Value = if path_lower.ends_with(".yaml") || path_lower.ends_with(".yml") {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };

    // JSON-LD context carries no configuration
    if let Value::Object(ref mut obj) = value {
        if obj.remove("@context").is_some() {
            debug!("Ignoring @context in {}", config_path);
        }
    }
    Ok(value)
}

/// Deserialize and validate configuration data
pub fn validate_config(config_data: Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data)?;
    config.validate()?;
    Ok(config)
}

/// Load a text file as UTF-8, dropping a byte order mark if present.
/// Invalid sequences are replaced rather than rejected.
pub fn load_text_file(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    Ok(decode_text(&bytes))
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let (cow, _had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    cow.into_owned()
}
