//! Remote narrative generation with local fallback.
//!
//! Sections are requested strictly one after another (revenue, profitability,
//! eps, sentiment). There is no fan-out, retry or backoff: a single request per
//! section, and the first failure abandons the remote path.

use std::sync::Arc;

use analysis_core::{
    AnalysisError, FinancialRecord, InsightGenerator, InsightSource, Section, SectionInsights,
};
use async_trait::async_trait;
use llm_client::{build_prompt, ChatCompletion, ChatMessage, LlmCredentials, SYSTEM_PROMPT};
use serde::Serialize;

/// Insights plus where they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightOutcome {
    pub insights: SectionInsights,
    pub source: InsightSource,
    /// Set when the remote path failed and local insights were substituted
    pub notice: Option<String>,
}

/// [`InsightGenerator`] that asks a chat-completion endpoint for every section.
///
/// Sections that come back empty are filled from `local`.
pub struct RemoteInsightGenerator {
    chat: Arc<dyn ChatCompletion>,
    credentials: LlmCredentials,
    local: Arc<dyn InsightGenerator>,
}

impl RemoteInsightGenerator {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        credentials: LlmCredentials,
        local: Arc<dyn InsightGenerator>,
    ) -> Self {
        Self {
            chat,
            credentials,
            local,
        }
    }
}

#[async_trait]
impl InsightGenerator for RemoteInsightGenerator {
    async fn generate(
        &self,
        ticker: &str,
        records: &[FinancialRecord],
    ) -> Result<SectionInsights, AnalysisError> {
        let local = self.local.generate(ticker, records).await?;
        let mut insights = SectionInsights::default();

        for section in Section::ALL {
            let prompt = build_prompt(section, ticker, records)
                .map_err(|e| AnalysisError::RemoteError(e.summary()))?;
            let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

            tracing::info!(
                "Requesting {} insights for {} via {} ({})",
                section.key(),
                ticker,
                self.chat.provider_name(),
                self.credentials.model
            );
            let text = self
                .chat
                .complete(&self.credentials, &messages)
                .await
                .map_err(|e| {
                    // Full error (including any upstream body) stays in the logs
                    tracing::warn!("{} request for {} failed: {}", section.key(), ticker, e);
                    AnalysisError::RemoteError(e.summary())
                })?;

            if text.trim().is_empty() {
                tracing::warn!(
                    "Empty {} response for {}, using {} text for that section",
                    section.key(),
                    ticker,
                    self.local.name()
                );
                insights.set(section, local.get(section).to_string());
            } else {
                insights.set(section, text);
            }
        }

        Ok(insights)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Remote insights when credentials are present, otherwise (or on any remote
/// failure) exactly what `local` produces for the same records.
pub async fn fetch_insights(
    chat: Arc<dyn ChatCompletion>,
    local: Arc<dyn InsightGenerator>,
    credentials: Option<LlmCredentials>,
    ticker: &str,
    records: &[FinancialRecord],
) -> Result<InsightOutcome, AnalysisError> {
    let credentials = match credentials {
        Some(credentials) => credentials,
        None => {
            tracing::debug!("No API key configured, using {} insights for {}", local.name(), ticker);
            return Ok(InsightOutcome {
                insights: local.generate(ticker, records).await?,
                source: InsightSource::Local,
                notice: None,
            });
        }
    };

    let model = credentials.model.clone();
    let remote = RemoteInsightGenerator::new(chat, credentials, local.clone());
    match remote.generate(ticker, records).await {
        Ok(insights) => Ok(InsightOutcome {
            insights,
            source: InsightSource::Remote { model },
            notice: None,
        }),
        Err(AnalysisError::InsufficientData(msg)) => Err(AnalysisError::InsufficientData(msg)),
        Err(e) => {
            tracing::warn!(
                "{} insights failed for {}: {}. Falling back to {} analysis",
                remote.name(),
                ticker,
                e,
                local.name()
            );
            let reason = match e {
                AnalysisError::RemoteError(reason) => reason,
                other => other.to_string(),
            };
            Ok(InsightOutcome {
                insights: local.generate(ticker, records).await?,
                source: InsightSource::Local,
                notice: Some(format!(
                    "AI analysis unavailable ({}). Showing detailed local analysis instead.",
                    reason
                )),
            })
        }
    }
}
