use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fs_ext::read_file_to_string;

const APP_NAME: &str = "testpilot";
const CONFIG_PATH_VAR: &str = "TESTPILOT_CONFIG_PATH";
const CONFIG_FILE_NAME: &str = "config.toml";

/// The only place the upstream credential may come from.
pub const API_KEY_VAR: &str = "TESTPILOT_API_KEY";

pub const DEFAULT_CONFIG_DIR: &str = "./configs";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are TestPilot, an assistant expert in Playwright test automation.";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// The fixed parts of every upstream completion call.
///
/// The credential is deliberately not a field here: it is read from
/// [`API_KEY_VAR`] when the client is built and never serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            base_url: default_base_url(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self> {
        get_config()
    }
}

fn get_config() -> Result<RelayConfig> {
    let path = if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        PathBuf::from(path)
    } else if let Some(path) = base_dirs()?.find_config_file(CONFIG_FILE_NAME) {
        path
    } else {
        return Ok(RelayConfig::default());
    };

    let contents = read_file_to_string(path)?;
    let config = toml::from_str(&contents)?;

    Ok(config)
}

fn base_dirs() -> Result<xdg::BaseDirectories> {
    Ok(xdg::BaseDirectories::with_prefix(APP_NAME)?)
}

pub fn api_key_from_env() -> Option<String> {
    match std::env::var(API_KEY_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_falls_back_to_defaults() {
        let config: RelayConfig = toml::from_str("").expect("empty config should parse");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            model = "gpt-4o-mini"
            system_prompt = "You are a terse reviewer."
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.system_prompt, "You are a terse reviewer.");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = RelayConfig {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "local-model".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            timeout_secs: 5,
        };

        let contents = toml::to_string(&config).expect("config should serialize");
        let parsed: RelayConfig = toml::from_str(&contents).expect("config should parse back");

        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.system_prompt, config.system_prompt);
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
    }
}
