use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// One fiscal year of (synthetic) company financials.
///
/// Monetary values are in crores. Serialized with camelCase keys, which is
/// also the shape embedded into remote prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub year: String,
    pub revenue: i64,
    pub operating_profit: i64,
    /// Operating profit margin, whole percent
    pub opm: i64,
    pub pbt: i64,
    pub pat: i64,
    pub eps: i64,
    /// Percent change against the reconstructed prior-year EPS
    pub eps_growth: f64,
    /// One-decimal string, e.g. "1.3"
    pub peg_ratio: String,
    pub roe: i64,
    pub roce: i64,
    pub net_worth: i64,
    pub total_assets: i64,
}

impl FinancialRecord {
    /// Numeric PEG ratio. Falls back to 0.0 if the string is not a number.
    pub fn peg_value(&self) -> f64 {
        self.peg_ratio.parse().unwrap_or(0.0)
    }
}

/// Narrative report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Revenue,
    Profitability,
    Eps,
    Sentiment,
}

impl Section {
    /// Every section, in the order they are generated and displayed.
    pub const ALL: [Section; 4] = [
        Section::Revenue,
        Section::Profitability,
        Section::Eps,
        Section::Sentiment,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Revenue => "revenue",
            Section::Profitability => "profitability",
            Section::Eps => "eps",
            Section::Sentiment => "sentiment",
        }
    }

    /// Human-readable title for panels and reports
    pub fn title(&self) -> &'static str {
        match self {
            Section::Revenue => "Revenue & Operating Performance",
            Section::Profitability => "Profitability Analysis",
            Section::Eps => "EPS Performance & Valuation",
            Section::Sentiment => "Investment Sentiment",
        }
    }
}

/// Narrative text for every section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionInsights {
    pub revenue: String,
    pub profitability: String,
    pub eps: String,
    pub sentiment: String,
}

impl SectionInsights {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Revenue => &self.revenue,
            Section::Profitability => &self.profitability,
            Section::Eps => &self.eps,
            Section::Sentiment => &self.sentiment,
        }
    }

    pub fn set(&mut self, section: Section, text: String) {
        match section {
            Section::Revenue => self.revenue = text,
            Section::Profitability => self.profitability = text,
            Section::Eps => self.eps = text,
            Section::Sentiment => self.sentiment = text,
        }
    }
}

/// Where a set of insights came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InsightSource {
    Remote { model: String },
    Local,
}

/// Investment recommendation derived from the 0-10 sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    WeakHold,
    Avoid,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s > 8.0 => Recommendation::StrongBuy,
            s if s > 6.5 => Recommendation::Buy,
            s if s > 5.0 => Recommendation::Hold,
            s if s > 3.0 => Recommendation::WeakHold,
            _ => Recommendation::Avoid,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::WeakHold => "WEAK HOLD",
            Recommendation::Avoid => "AVOID",
        }
    }

    /// Traffic-light marker shown next to the label
    pub fn marker(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy | Recommendation::Buy => "🟢",
            Recommendation::Hold => "🟡",
            Recommendation::WeakHold => "🟠",
            Recommendation::Avoid => "🔴",
        }
    }
}

/// Characters a ticker may never contain; they would break file names and headers.
const FORBIDDEN_TICKER_CHARS: [char; 3] = ['"', '\\', '/'];

/// Trim and uppercase a user-supplied ticker. Empty input, control characters
/// and quote/slash characters are rejected.
pub fn normalize_ticker(raw: &str) -> Result<String, AnalysisError> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Please enter a stock name".to_string(),
        ));
    }
    if ticker
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_TICKER_CHARS.contains(&c))
    {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid characters in stock name: {:?}",
            ticker
        )));
    }
    Ok(ticker.to_uppercase())
}
