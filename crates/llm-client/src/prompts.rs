use analysis_core::{FinancialRecord, Section};

use crate::error::LlmResult;

pub const SYSTEM_PROMPT: &str = "You are a senior financial analyst. Provide detailed, data-driven insights with specific calculations. Use bullet points and emojis. Be comprehensive yet easy to understand.";

/// What the analyst is asked to cover for each section.
fn focus_points(section: Section) -> &'static [&'static str] {
    match section {
        Section::Revenue => &[
            "Revenue CAGR calculation and trend analysis",
            "Operating margin (OPM) evolution and efficiency",
            "Revenue consistency and growth quality",
            "Operational leverage and scalability",
            "Competitive positioning based on growth",
        ],
        Section::Profitability => &[
            "PAT vs PBT trends and tax efficiency",
            "ROE and ROCE as measures of capital efficiency",
            "Profit margin evolution and sustainability",
            "Earnings consistency and one-time impacts",
            "Financial management effectiveness",
        ],
        Section::Eps => &[
            "EPS CAGR and growth trajectory",
            "EPS volatility and earnings quality",
            "PEG ratio valuation assessment",
            "Growth vs valuation attractiveness",
            "Investment recommendation based on EPS trends",
        ],
        Section::Sentiment => &[
            "Overall investment rating on a 0-10 scale with a BUY/HOLD/AVOID call",
            "Key growth drivers and strengths",
            "Principal risk factors",
            "Suggested investment horizon",
            "Risk-reward profile",
        ],
    }
}

fn heading(section: Section) -> &'static str {
    match section {
        Section::Revenue => "Revenue & Operating Performance",
        Section::Profitability => "Profitability Metrics",
        Section::Eps => "EPS Performance & Valuation",
        Section::Sentiment => "Overall Investment Sentiment",
    }
}

/// User prompt for one section with the records embedded as pretty JSON.
pub fn build_prompt(
    section: Section,
    ticker: &str,
    records: &[FinancialRecord],
) -> LlmResult<String> {
    let data = serde_json::to_string_pretty(records)?;
    let bullets = focus_points(section)
        .iter()
        .map(|point| format!("• {}", point))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "Analyze {}'s {} over {} years:\n{}\n\nProvide detailed insights on:\n{}",
        ticker,
        heading(section),
        records.len(),
        data,
        bullets
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthetic_data::generate_series;

    #[test]
    fn test_prompt_embeds_records() {
        let records = generate_series("TCS");
        let prompt = build_prompt(Section::Revenue, "TCS", &records).unwrap();
        assert!(prompt.starts_with("Analyze TCS's Revenue & Operating Performance over 5 years:\n"));
        assert!(prompt.contains("\"operatingProfit\""));
        assert!(prompt.contains("\"revenue\": 18345"));
        assert!(prompt.contains("• Revenue CAGR calculation and trend analysis"));
    }

    #[test]
    fn test_every_section_has_distinct_prompt() {
        let records = generate_series("INFY");
        let prompts: Vec<String> = Section::ALL
            .iter()
            .map(|s| build_prompt(*s, "INFY", &records).unwrap())
            .collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(prompts[3].contains("Overall Investment Sentiment"));
    }
}
