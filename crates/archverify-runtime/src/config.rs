//! Runtime configuration.
//!
//! Loaded from YAML or JSON; every field has a default, so an empty file is
//! a valid configuration that runs rule-based checks only.
//!
//! ```yaml
//! profile: split
//! limits:
//!   single_chars: 2000
//!   joint_chars: 3000
//! tokens:
//!   single: 128
//!   joint: 256
//! backend:
//!   type: remote
//!   model_id: mistralai/Mistral-7B-Instruct-v0.2
//!   token_env: HF_TOKEN
//!   timeout: 60s
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use archverify_core::Profile;

use crate::providers::{LOCAL_MAX_TIME, REMOTE_TIMEOUT};

/// Environment variable that overrides the configured profile.
pub const PROFILE_ENV: &str = "ARCHVERIFY_PROFILE";

/// Default hosted inference endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default environment variable holding the inference token.
pub const DEFAULT_TOKEN_ENV: &str = "HF_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub profile: Profile,
    pub limits: PromptLimits,
    pub tokens: TokenBudgets,
    pub backend: BackendConfig,
    pub local: LocalSettings,
}

/// Character limits applied to artifact bodies before prompting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptLimits {
    pub single_chars: usize,
    pub joint_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            single_chars: 2000,
            joint_chars: 3000,
        }
    }
}

/// New-token budgets per generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBudgets {
    pub single: u32,
    pub joint: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            single: 128,
            joint: 256,
        }
    }
}

/// Which text source to build at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    None,
    Remote(RemoteSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub model_id: String,

    /// Environment variable holding the bearer token. The token itself is
    /// never part of the configuration.
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,

    #[serde(default = "default_remote_timeout", with = "humantime_duration")]
    pub timeout: Duration,
}

/// Settings applied when the process attaches a local model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    #[serde(with = "humantime_duration")]
    pub max_time: Duration,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            max_time: LOCAL_MAX_TIME,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_env() -> Option<String> {
    Some(DEFAULT_TOKEN_ENV.to_string())
}

fn default_remote_timeout() -> Duration {
    REMOTE_TIMEOUT
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

impl RuntimeConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Apply [`PROFILE_ENV`] if it is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = std::env::var(PROFILE_ENV) {
            self.profile = Profile::from_name(&name);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.single_chars == 0 || self.limits.joint_chars == 0 {
            return Err(ConfigError::Invalid("character limits must be positive".to_string()));
        }
        if self.tokens.single == 0 || self.tokens.joint == 0 {
            return Err(ConfigError::Invalid("token budgets must be positive".to_string()));
        }
        if self.local.max_time.is_zero() {
            return Err(ConfigError::Invalid("local max_time must be positive".to_string()));
        }

        if let BackendConfig::Remote(remote) = &self.backend {
            if !remote.base_url.starts_with("http://") && !remote.base_url.starts_with("https://") {
                return Err(ConfigError::Invalid(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
            if remote.model_id.trim().is_empty() {
                return Err(ConfigError::Invalid("remote model_id must not be empty".to_string()));
            }
            if remote.timeout.is_zero() {
                return Err(ConfigError::Invalid("remote timeout must be positive".to_string()));
            }
        }

        Ok(())
    }
}
