use serde::Serialize;

use crate::error::SettingsError;

/// Every OpenRouter key carries this prefix.
pub const API_KEY_PREFIX: &str = "sk-or-v1-";

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1";

/// A selectable model and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const AVAILABLE_MODELS: &[ModelOption] = &[
    ModelOption {
        id: "deepseek/deepseek-r1",
        label: "DeepSeek R1 (Recommended)",
    },
    ModelOption {
        id: "openai/gpt-4o",
        label: "GPT-4o",
    },
    ModelOption {
        id: "anthropic/claude-3.5-sonnet",
        label: "Claude 3.5 Sonnet",
    },
    ModelOption {
        id: "meta-llama/llama-3.1-70b-instruct",
        label: "Llama 3.1 70B",
    },
    ModelOption {
        id: "google/gemini-pro-1.5",
        label: "Gemini Pro 1.5",
    },
];

pub fn model_label(id: &str) -> Option<&'static str> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id).map(|m| m.label)
}

/// Check a user-entered key without storing it. Returns the trimmed key.
pub fn validate_api_key(raw: &str) -> Result<String, SettingsError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(SettingsError::MissingApiKey);
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(SettingsError::InvalidApiKey(API_KEY_PREFIX));
    }
    Ok(key.to_string())
}

pub fn validate_model(model: &str) -> Result<String, SettingsError> {
    match model_label(model) {
        Some(_) => Ok(model.to_string()),
        None => Err(SettingsError::UnknownModel(model.to_string())),
    }
}

/// `sk-or-v1-…abcd`, safe to echo back to the browser.
pub fn mask_api_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if key.chars().count() <= API_KEY_PREFIX.len() + 4 {
        return format!("{}…", API_KEY_PREFIX);
    }
    format!("{}…{}", API_KEY_PREFIX, tail)
}

/// Bearer credential and model for one analysis, read at call time and
/// passed explicitly to the fetcher.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmCredentials {
    pub api_key: String,
    pub model: String,
}

impl LlmCredentials {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl std::fmt::Debug for LlmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCredentials")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}
