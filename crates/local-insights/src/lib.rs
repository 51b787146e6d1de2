//! Rule-based narrative insights.
//!
//! Turns a record sequence into four bullet summaries using fixed threshold
//! tables. No state and no network: this is also what every remote failure
//! falls back to, so its output must stay a pure function of the records.

pub mod scoring;

use analysis_core::format::{crores, group_thousands};
use analysis_core::growth::{cagr, count_increases, mean};
use analysis_core::{AnalysisError, FinancialRecord, InsightGenerator, SectionInsights};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use scoring::{risks, sentiment_score, strengths, SentimentSummary};

/// Assumed market-wide revenue growth, percent.
const MARKET_GROWTH: f64 = 12.0;

/// Headline metrics every section draws on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub sales_cagr: f64,
    pub profit_cagr: f64,
    pub eps_cagr: f64,
    pub avg_roe: f64,
    pub avg_roce: f64,
    pub current_peg: f64,
    /// Change in operating margin from first to last year, basis points
    pub margin_expansion_bp: f64,
}

impl KeyMetrics {
    pub fn from_records(records: &[FinancialRecord]) -> Result<Self, AnalysisError> {
        let (first, last) = match (records.first(), records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(AnalysisError::InsufficientData(
                    "No financial records to analyze".to_string(),
                ))
            }
        };
        let periods = records.len() - 1;

        let roe: Vec<f64> = records.iter().map(|r| r.roe as f64).collect();
        let roce: Vec<f64> = records.iter().map(|r| r.roce as f64).collect();

        Ok(Self {
            sales_cagr: cagr(first.revenue as f64, last.revenue as f64, periods),
            profit_cagr: cagr(first.pat as f64, last.pat as f64, periods),
            eps_cagr: cagr(first.eps as f64, last.eps as f64, periods),
            avg_roe: mean(&roe),
            avg_roce: mean(&roce),
            current_peg: last.peg_value(),
            margin_expansion_bp: ((last.opm - first.opm) * 100) as f64,
        })
    }
}

/// Build all four sections for `ticker` from `records`.
pub fn generate_local_insights(
    ticker: &str,
    records: &[FinancialRecord],
) -> Result<SectionInsights, AnalysisError> {
    let metrics = KeyMetrics::from_records(records)?;
    tracing::debug!(
        "Local insights for {}: sales CAGR {:.1}%, profit CAGR {:.1}%, EPS CAGR {:.1}%",
        ticker,
        metrics.sales_cagr,
        metrics.profit_cagr,
        metrics.eps_cagr
    );

    Ok(SectionInsights {
        revenue: revenue_insights(records, &metrics),
        profitability: profitability_insights(records, &metrics),
        eps: eps_insights(records, &metrics),
        sentiment: sentiment_insights(&metrics),
    })
}

fn revenue_insights(data: &[FinancialRecord], m: &KeyMetrics) -> String {
    let first = &data[0];
    let last = &data[data.len() - 1];
    let cagr = m.sales_cagr;
    let om = m.margin_expansion_bp;

    let growth = if cagr > 15.0 {
        "Exceptional"
    } else if cagr > 12.0 {
        "Strong"
    } else if cagr > 8.0 {
        "Moderate"
    } else {
        "Slow"
    };
    let trend = if om > 150.0 {
        "rapidly expanding"
    } else if om > 50.0 {
        "expanding"
    } else if om > 0.0 {
        "stable"
    } else {
        "contracting"
    };
    let consistency = count_increases(&data.iter().map(|d| d.revenue).collect::<Vec<_>>());
    let execution = if consistency >= 4 {
        "excellent"
    } else if consistency >= 3 {
        "good"
    } else {
        "inconsistent"
    };
    let position = if cagr > 12.0 {
        "Market leader potential with sustainable competitive advantages"
    } else if cagr > 8.0 {
        "Solid market player with growth opportunities"
    } else {
        "Needs strategic repositioning for better growth"
    };
    let quality = if cagr > MARKET_GROWTH {
        "Outperforming market averages"
    } else {
        "Underperforming relative to market standards"
    };

    format!(
        "**📈 Revenue Analysis (Detailed Local Analysis):**\n\
         • **Growth Performance**: {growth} revenue growth at {cagr:.1}% CAGR over {}-{} period\n\
         • **Scale Expansion**: Revenue grew from {} to {}\n\
         • **Operating Efficiency**: Margins {trend} by {:.0} basis points, indicating {} operational control\n\
         • **Growth Consistency**: {consistency}/{} years showed positive growth, demonstrating {execution} execution\n\
         • **Market Position**: {position}\n\
         • **Revenue Quality**: {quality}",
        first.year,
        last.year,
        crores(first.revenue),
        crores(last.revenue),
        om.abs(),
        if om > 0.0 { "improving" } else { "declining" },
        data.len() - 1,
    )
}

fn profitability_insights(data: &[FinancialRecord], m: &KeyMetrics) -> String {
    let first = &data[0];
    let last = &data[data.len() - 1];
    let cagr = m.profit_cagr;
    let roe = m.avg_roe;
    let roce = m.avg_roce;

    let quality = if cagr > 15.0 {
        "Superior"
    } else if cagr > 10.0 {
        "Strong"
    } else if cagr > 5.0 {
        "Moderate"
    } else {
        "Weak"
    };
    let efficiency = if roe > 20.0 {
        "Excellent"
    } else if roe > 15.0 {
        "Good"
    } else if roe > 10.0 {
        "Average"
    } else {
        "Poor"
    };
    let deployment = if roce > 15.0 {
        "Strong"
    } else if roce > 10.0 {
        "Adequate"
    } else {
        "Weak"
    };
    let consistency = count_increases(&data.iter().map(|d| d.pat).collect::<Vec<_>>());
    let stream = if consistency >= 4 {
        "highly reliable"
    } else if consistency >= 3 {
        "moderately stable"
    } else {
        "volatile"
    };

    format!(
        "**💰 Profitability Analysis (Detailed Local Analysis):**\n\
         • **Earnings Growth**: {quality} net profit CAGR of {cagr:.1}% showcasing {} value creation ability\n\
         • **Capital Efficiency Metrics**: \n  \
         - ROE: {roe:.1}% ({efficiency} shareholder value generation)\n  \
         - ROCE: {roce:.1}% ({deployment} capital deployment)\n\
         • **Margin Evolution**: Operating margins improved from {}% to {}%, showing {}\n\
         • **Profit Consistency**: {consistency}/{} years of growth indicates {stream} earnings stream\n\
         • **Management Efficiency**: {}\n\
         • **Competitive Moat**: {}",
        if cagr > 12.0 { "exceptional" } else { "moderate" },
        first.opm,
        last.opm,
        if last.opm > first.opm {
            "operational leverage"
        } else {
            "margin pressure"
        },
        data.len() - 1,
        if roe > roce {
            "Effective use of financial leverage"
        } else {
            "Conservative capital structure"
        },
        if roe > 18.0 && roce > 15.0 {
            "Strong economic moat with pricing power"
        } else {
            "Developing competitive advantages"
        },
    )
}

fn eps_insights(data: &[FinancialRecord], m: &KeyMetrics) -> String {
    let first = &data[0];
    let last = &data[data.len() - 1];
    let cagr = m.eps_cagr;
    let peg = m.current_peg;

    let valuation = if peg < 0.8 {
        "significantly undervalued"
    } else if peg < 1.2 {
        "fair value"
    } else if peg < 1.8 {
        "moderately expensive"
    } else {
        "overvalued"
    };
    let growth = if cagr > 20.0 {
        "Accelerating"
    } else if cagr > 15.0 {
        "Strong"
    } else if cagr > 10.0 {
        "Steady"
    } else {
        "Declining"
    };
    let wealth = if cagr > 15.0 {
        "Excellent wealth multiplier for long-term investors"
    } else if cagr > 10.0 {
        "Decent returns for patient capital"
    } else {
        "Below-average wealth creation"
    };
    let positive_years = count_increases(&data.iter().map(|d| d.eps).collect::<Vec<_>>());

    format!(
        "**📊 EPS Performance (Detailed Local Analysis):**\n\
         • **Earnings Per Share Journey**: Grew from ₹{} to ₹{} at {cagr:.1}% CAGR\n\
         • **Growth Trajectory**: {growth} earnings expansion indicating {}\n\
         • **Valuation Assessment**: PEG ratio of {peg} suggests {valuation} investment opportunity\n\
         • **Shareholder Wealth Creation**: {wealth}\n\
         • **Earnings Quality**: {positive_years}/{} years of positive EPS growth shows {} management execution\n\
         • **Future Potential**: {}",
        group_thousands(first.eps),
        group_thousands(last.eps),
        if cagr > 15.0 {
            "exceptional business momentum"
        } else {
            "moderate business progress"
        },
        data.len() - 1,
        if positive_years >= 4 { "exceptional" } else { "moderate" },
        if peg < 1.0 && cagr > 12.0 {
            "High probability of continued outperformance"
        } else {
            "Requires monitoring for sustained performance"
        },
    )
}

fn sentiment_insights(m: &KeyMetrics) -> String {
    let summary = SentimentSummary::from_metrics(m);
    let score = summary.score;
    let sales = m.sales_cagr;
    let profit = m.profit_cagr;

    let (action, horizon, profile) = if score > 7.0 {
        (
            "ACCUMULATE - Strong fundamentals with multiple growth catalysts",
            "3-5 years for wealth multiplication",
            "High reward, moderate risk",
        )
    } else if score > 5.0 {
        (
            "MONITOR - Mixed signals requiring closer tracking",
            "1-2 years with active monitoring",
            "Moderate reward, moderate risk",
        )
    } else {
        (
            "AVOID - Weak metrics with limited upside potential",
            "Not suitable for current market conditions",
            "Low reward, high risk",
        )
    };

    format!(
        "**🎯 Investment Sentiment (Comprehensive Local Analysis):**\n\
         • **Overall Investment Rating**: {} {} (Score: {score}/10)\n\
         • **Growth Drivers Analysis**:\n  \
         - Revenue momentum: {sales:.1}% CAGR {}\n  \
         - Profit expansion: {profit:.1}% CAGR {}\n\
         • **Key Strengths**: {}\n\
         • **Risk Factors**: {}\n\
         • **Investment Recommendation**: \n  \
         - {action}\n\
         • **Optimal Investment Horizon**: {horizon}\n\
         • **Risk-Reward Profile**: {profile}",
        summary.recommendation.marker(),
        summary.recommendation.to_label(),
        if sales > 12.0 {
            "(Strong tailwinds)"
        } else {
            "(Moderate growth)"
        },
        if profit > 15.0 {
            "(Exceptional execution)"
        } else {
            "(Steady progress)"
        },
        strengths(m),
        risks(m),
    )
}

/// [`InsightGenerator`] backed by the fixed rule tables.
#[derive(Debug, Clone, Default)]
pub struct LocalInsightEngine;

impl LocalInsightEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InsightGenerator for LocalInsightEngine {
    async fn generate(
        &self,
        ticker: &str,
        records: &[FinancialRecord],
    ) -> Result<SectionInsights, AnalysisError> {
        generate_local_insights(ticker, records)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
