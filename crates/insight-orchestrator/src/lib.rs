//! Ties the pieces together: ticker normalization, synthetic financials,
//! key metrics, sentiment, and narrative insights (remote or local).

use std::sync::Arc;

use analysis_core::{
    normalize_ticker, AnalysisError, FinancialRecord, InsightGenerator, InsightSource,
    SectionInsights,
};
use llm_client::{ChatCompletion, SettingsStore};
use local_insights::{KeyMetrics, LocalInsightEngine, SentimentSummary};
use serde::Serialize;
use synthetic_data::SyntheticDataGenerator;

pub mod remote;
pub use remote::{fetch_insights, InsightOutcome, RemoteInsightGenerator};

/// Everything the UI or a report needs for one ticker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub ticker: String,
    pub records: Vec<FinancialRecord>,
    pub metrics: KeyMetrics,
    pub sentiment: SentimentSummary,
    pub insights: SectionInsights,
    pub source: InsightSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

pub struct StockAnalyzer {
    generator: SyntheticDataGenerator,
    chat: Arc<dyn ChatCompletion>,
    /// Used when no key is stored and whenever the remote path fails
    local: Arc<dyn InsightGenerator>,
    settings: Arc<dyn SettingsStore>,
}

impl StockAnalyzer {
    pub fn new(chat: Arc<dyn ChatCompletion>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            generator: SyntheticDataGenerator::default(),
            chat,
            local: Arc::new(LocalInsightEngine::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    /// Normalized ticker and its synthetic multi-year financials.
    pub fn financials(&self, raw_ticker: &str) -> Result<(String, Vec<FinancialRecord>), AnalysisError> {
        let ticker = normalize_ticker(raw_ticker)?;
        let records = self.generator.series(&ticker);
        Ok((ticker, records))
    }

    /// Full analysis. Settings are read fresh on every call, so a key saved
    /// a moment ago is used by the next analysis.
    pub async fn analyze(&self, raw_ticker: &str) -> Result<StockAnalysis, AnalysisError> {
        let (ticker, records) = self.financials(raw_ticker)?;
        tracing::info!("Analyzing {} ({} years)", ticker, records.len());

        let metrics = KeyMetrics::from_records(&records)?;
        let sentiment = SentimentSummary::from_metrics(&metrics);

        let credentials = match self.settings.load().await {
            Ok(stored) => stored.credentials(),
            Err(e) => {
                tracing::warn!("Failed to read settings, continuing without API key: {}", e);
                None
            }
        };

        let outcome = fetch_insights(
            self.chat.clone(),
            self.local.clone(),
            credentials,
            &ticker,
            &records,
        )
        .await?;
        tracing::info!(
            "Analysis for {} complete: score {:.1}, {:?} insights",
            ticker,
            sentiment.score,
            outcome.source
        );

        Ok(StockAnalysis {
            ticker,
            records,
            metrics,
            sentiment,
            insights: outcome.insights,
            source: outcome.source,
            notice: outcome.notice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::{
        LlmConfig, MemorySettingsStore, OpenRouterClient, StoredSettings,
    };
    use local_insights::generate_local_insights;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer(base_url: String, settings: StoredSettings) -> StockAnalyzer {
        let config = LlmConfig {
            base_url,
            ..LlmConfig::default()
        };
        let chat = Arc::new(OpenRouterClient::new(config).unwrap());
        StockAnalyzer::new(chat, Arc::new(MemorySettingsStore::with_settings(settings)))
    }

    fn with_key() -> StoredSettings {
        StoredSettings {
            openrouter_api_key: Some("sk-or-v1-test".to_string()),
            openrouter_model: None,
        }
    }

    #[test]
    fn test_financials_normalizes_ticker() {
        let a = analyzer("http://127.0.0.1:1".into(), StoredSettings::default());
        let (ticker, records) = a.financials("  tcs ").unwrap();
        assert_eq!(ticker, "TCS");
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].revenue, 18345);
        assert!(matches!(a.financials("   "), Err(AnalysisError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_analyze_without_key_is_local() {
        let a = analyzer("http://127.0.0.1:1".into(), StoredSettings::default());
        let result = a.analyze("infy").await.unwrap();
        assert_eq!(result.ticker, "INFY");
        assert_eq!(result.source, InsightSource::Local);
        assert!(result.notice.is_none());
        assert_eq!(
            result.insights,
            generate_local_insights("INFY", &result.records).unwrap()
        );
    }

    #[tokio::test]
    async fn test_analyze_remote_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "• Remote view"}}]
            })))
            .expect(4)
            .mount(&server)
            .await;

        let a = analyzer(server.uri(), with_key());
        let result = a.analyze("TCS").await.unwrap();
        assert_eq!(
            result.source,
            InsightSource::Remote {
                model: "deepseek/deepseek-r1".into()
            }
        );
        assert_eq!(result.insights.sentiment, "• Remote view");
    }

    #[tokio::test]
    async fn test_analyze_remote_failure_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let a = analyzer(server.uri(), with_key());
        let result = a.analyze("RELIANCE").await.unwrap();
        assert_eq!(result.source, InsightSource::Local);
        let notice = result.notice.unwrap();
        assert!(notice.contains("429"));
        assert!(!notice.contains("rate limited"));
        assert_eq!(
            result.insights,
            generate_local_insights("RELIANCE", &result.records).unwrap()
        );
    }

    #[tokio::test]
    async fn test_analysis_serializes_camel_case() {
        let a = analyzer("http://127.0.0.1:1".into(), StoredSettings::default());
        let result = a.analyze("TCS").await.unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["ticker"], "TCS");
        assert_eq!(value["source"]["kind"], "local");
        assert!(value["records"][0]["operatingProfit"].is_i64());
        assert!(value.get("notice").is_none());
    }
}
