use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API call failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LlmError {
    /// One-line description without any upstream response body, safe to show to users.
    pub fn summary(&self) -> String {
        match self {
            LlmError::RequestFailed(e) if e.is_timeout() => "request timed out".to_string(),
            LlmError::RequestFailed(_) => "could not reach the AI service".to_string(),
            LlmError::Status { status, .. } => format!("AI service returned status {}", status),
            LlmError::InvalidResponse(_) => "unexpected response from the AI service".to_string(),
            LlmError::Serialization(_) => "could not encode the request".to_string(),
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_omits_response_body() {
        let err = LlmError::Status {
            status: 502,
            body: "<html><body>Bad gateway page</body></html>".to_string(),
        };
        assert_eq!(err.summary(), "AI service returned status 502");
        assert!(err.to_string().contains("Bad gateway page"));

        let err = LlmError::InvalidResponse("unexpected body: expected value".to_string());
        assert!(!err.summary().contains("expected value"));
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Please enter your API key")]
    MissingApiKey,

    #[error("Invalid API key format: OpenRouter API keys should start with '{0}'")]
    InvalidApiKey(&'static str),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("No configuration directory available for settings")]
    NoConfigDir,

    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
