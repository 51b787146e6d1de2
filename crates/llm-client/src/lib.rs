pub mod chat;
pub mod credentials;
pub mod error;
pub mod prompts;
pub mod settings;

pub use chat::{ChatCompletion, ChatMessage, OpenRouterClient};
pub use credentials::{
    mask_api_key, model_label, validate_api_key, validate_model, LlmCredentials, ModelOption,
    API_KEY_PREFIX, AVAILABLE_MODELS, DEFAULT_MODEL,
};
pub use error::{LlmError, LlmResult, SettingsError};
pub use prompts::{build_prompt, SYSTEM_PROMPT};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore, StoredSettings};

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for the chat-completion endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    /// Unset means the HTTP client's own default applies
    pub timeout: Option<Duration>,
    /// Sent as `HTTP-Referer` for OpenRouter attribution
    pub app_url: Option<String>,
    /// Sent as `X-Title`
    pub app_name: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            app_url: None,
            app_name: None,
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

impl LlmConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with a custom variable source.
    /// Empty or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        Self {
            base_url: var("LLM_BASE_URL").unwrap_or(defaults.base_url),
            timeout: var("LLM_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs),
            app_url: var("LLM_APP_URL"),
            app_name: var("LLM_APP_NAME"),
            temperature: defaults.temperature,
            max_tokens: var("LLM_MAX_TOKENS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }
}
