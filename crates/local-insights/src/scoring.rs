use analysis_core::growth::round_to;
use analysis_core::Recommendation;
use serde::{Deserialize, Serialize};

use crate::KeyMetrics;

/// Neutral starting point before any metric adjusts the score.
const BASE_SCORE: f64 = 5.0;

/// Sentiment score on a 0-10 scale and the recommendation it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub score: f64,
    pub recommendation: Recommendation,
}

impl SentimentSummary {
    pub fn from_metrics(metrics: &KeyMetrics) -> Self {
        let score = sentiment_score(metrics);
        Self {
            score,
            recommendation: Recommendation::from_score(score),
        }
    }
}

/// Weighted rule table: each metric nudges the base score up or down by band.
/// Rounded to one decimal and clamped to [0, 10].
pub fn sentiment_score(metrics: &KeyMetrics) -> f64 {
    let mut score = BASE_SCORE;

    let sales = metrics.sales_cagr;
    if sales > 20.0 {
        score += 2.0;
    } else if sales > 15.0 {
        score += 1.5;
    } else if sales > 10.0 {
        score += 1.0;
    } else if sales < 5.0 {
        score -= 1.0;
    }

    let profit = metrics.profit_cagr;
    if profit > 25.0 {
        score += 2.0;
    } else if profit > 15.0 {
        score += 1.5;
    } else if profit > 10.0 {
        score += 1.0;
    } else if profit < 5.0 {
        score -= 1.0;
    }

    let roe = metrics.avg_roe;
    if roe > 25.0 {
        score += 1.5;
    } else if roe > 20.0 {
        score += 1.0;
    } else if roe > 15.0 {
        score += 0.5;
    } else if roe < 10.0 {
        score -= 0.5;
    }

    let peg = metrics.current_peg;
    if peg < 0.8 {
        score += 1.5;
    } else if peg < 1.2 {
        score += 0.5;
    } else if peg > 2.0 {
        score -= 1.5;
    } else if peg > 1.8 {
        score -= 1.0;
    }

    let margin_bp = metrics.margin_expansion_bp;
    if margin_bp > 150.0 {
        score += 1.0;
    } else if margin_bp > 50.0 {
        score += 0.5;
    } else if margin_bp < -50.0 {
        score -= 1.0;
    }

    round_to(score, 1).clamp(0.0, 10.0)
}

pub fn strengths(metrics: &KeyMetrics) -> String {
    let mut strengths = Vec::new();
    if metrics.sales_cagr > 15.0 {
        strengths.push("Robust revenue growth");
    }
    if metrics.profit_cagr > 20.0 {
        strengths.push("Exceptional profit expansion");
    }
    if metrics.avg_roe > 20.0 {
        strengths.push("Superior capital efficiency");
    }
    if metrics.current_peg < 1.0 {
        strengths.push("Attractive valuation");
    }
    if metrics.margin_expansion_bp > 100.0 {
        strengths.push("Margin expansion");
    }

    if strengths.is_empty() {
        "Stable business model".to_string()
    } else {
        strengths.join(", ")
    }
}

pub fn risks(metrics: &KeyMetrics) -> String {
    let mut risks = Vec::new();
    if metrics.sales_cagr < 8.0 {
        risks.push("Slow revenue growth");
    }
    if metrics.profit_cagr < 10.0 {
        risks.push("Weak profit momentum");
    }
    if metrics.avg_roe < 12.0 {
        risks.push("Low capital efficiency");
    }
    if metrics.current_peg > 2.0 {
        risks.push("High valuation risk");
    }
    if metrics.margin_expansion_bp < -50.0 {
        risks.push("Margin pressure");
    }

    if risks.is_empty() {
        "Market volatility, regulatory changes".to_string()
    } else {
        risks.join(", ")
    }
}
