use async_trait::async_trait;
use crate::{AnalysisError, FinancialRecord, SectionInsights};

/// Anything that can turn a record sequence into narrative insights.
///
/// The rule-based generator and the remote chat-completion fetcher both
/// implement this, so callers can swap one for the other.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(
        &self,
        ticker: &str,
        records: &[FinancialRecord],
    ) -> Result<SectionInsights, AnalysisError>;

    fn name(&self) -> &'static str;
}
