use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credentials::LlmCredentials;
use crate::error::{LlmError, LlmResult};
use crate::LlmConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Opaque text-completion oracle: submit messages, get text or an error.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the first choice's content. An absent or null content comes
    /// back as an empty string; callers decide what empty means.
    async fn complete(
        &self,
        credentials: &LlmCredentials,
        messages: &[ChatMessage],
    ) -> LlmResult<String>;

    fn provider_name(&self) -> &'static str;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenRouterClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(
        &self,
        credentials: &LlmCredentials,
        messages: &[ChatMessage],
    ) -> LlmResult<String> {
        let request = ChatCompletionRequest {
            model: &credentials.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let mut builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(&credentials.api_key)
            .json(&request);
        if let Some(url) = &self.config.app_url {
            builder = builder.header("HTTP-Referer", url);
        }
        if let Some(name) = &self.config.app_name {
            builder = builder.header("X-Title", name);
        }

        tracing::debug!("POST {} (model {})", self.endpoint(), credentials.model);
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Chat completion failed with status {}", status);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| LlmError::InvalidResponse(format!("unexpected body: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }
}
