//! Model and provider configuration.
//!
//! Loaded once at startup (YAML file, then environment) and shared
//! immutably afterwards. Every section has working defaults, so an empty
//! file or no file at all is a valid configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable holding the provider bearer token.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A pipeline role that is served by one named model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Classifier,
    Interpreter,
    Generator,
    InstructTuned,
    Reviewer,
}

/// Model identifier per pipeline role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelTable {
    pub classifier: String,
    pub interpreter: String,
    pub generator: String,
    pub instruct_tuned: String,
    pub reviewer: String,
}

impl Default for ModelTable {
    fn default() -> Self {
        Self {
            classifier: "mistralai/mistral-7b-instruct:free".into(),
            interpreter: "google/gemini-2.0-flash-thinking-exp:free".into(),
            generator: "qwen/qwen2.5-vl-32b-instruct:free".into(),
            instruct_tuned: "mistralai/mistral-7b-instruct:free".into(),
            reviewer: "deepseek/deepseek-r1:free".into(),
        }
    }
}

impl ModelTable {
    /// Resolve a role to its model ID.
    pub fn get(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Classifier => &self.classifier,
            ModelRole::Interpreter => &self.interpreter,
            ModelRole::Generator => &self.generator,
            ModelRole::InstructTuned => &self.instruct_tuned,
            ModelRole::Reviewer => &self.reviewer,
        }
    }
}

/// Remote chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            temperature: 0.5,
            max_tokens: 9999,
            timeout_secs: 60,
            referer: "https://conv-code-generation-agent.vercel.app".into(),
            title: "Code Generation Agent".into(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory searched for `favicon.ico`.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            static_dir: PathBuf::from("."),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub models: ModelTable,
    pub provider: ProviderConfig,
    pub server: ServerConfig,
}

impl AgentConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Apply `OPENROUTER_API_KEY` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Set the API key when `key` is present and non-blank.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
        self
    }

    /// Log a warning when no API key is configured. Startup continues.
    pub fn warn_if_unconfigured(&self) -> bool {
        if self.provider.api_key.is_none() {
            warn!("{API_KEY_ENV} not found in environment; every remote call will fail until it is set");
            return true;
        }
        false
    }
}
