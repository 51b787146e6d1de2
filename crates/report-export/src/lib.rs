//! Static, self-contained HTML report for one analyzed ticker.

pub mod insight_html;
pub mod table;

pub use insight_html::{escape_html, insights_to_html};
pub use table::{format_value, Column};

use analysis_core::format::crores;
use analysis_core::{FinancialRecord, Recommendation, Section, SectionInsights};
use chrono::{DateTime, Utc};

/// Download name, e.g. `TCS_financial_report.html`. Anything outside
/// `[A-Za-z0-9._&-]` becomes `_` so the name is safe in a quoted header.
pub fn report_filename(ticker: &str) -> String {
    let safe: String = ticker
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '&' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_financial_report.html", safe)
}

/// Everything rendered into the report.
pub struct FinancialReport<'a> {
    pub ticker: &'a str,
    pub records: &'a [FinancialRecord],
    pub insights: &'a SectionInsights,
    pub score: f64,
    pub recommendation: Recommendation,
    /// Shown under the title, e.g. the model name or "Local analysis"
    pub source_label: String,
    pub generated_at: DateTime<Utc>,
}

impl FinancialReport<'_> {
    pub fn render(&self) -> String {
        let ticker = escape_html(self.ticker);
        let source = escape_html(&self.source_label);
        let generated = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC");
        let cards = self.render_cards();
        let table = self.render_table();
        let sections = self.render_sections();
        let marker = self.recommendation.marker();
        let label = self.recommendation.to_label();
        let score = self.score;

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{ticker} Financial Report</title>
<style>
  body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background:#f8fafc; color:#1e293b; margin:0; padding:32px; }}
  h1 {{ margin:0 0 4px; }}
  .sub {{ color:#64748b; margin:0 0 24px; }}
  .cards {{ display:grid; grid-template-columns:repeat(4,1fr); gap:16px; margin-bottom:24px; }}
  .card {{ background:#fff; border:1px solid #e2e8f0; border-radius:8px; padding:16px; }}
  .card .value {{ font-size:24px; font-weight:700; }}
  .card .label {{ font-size:13px; color:#64748b; }}
  table {{ width:100%; border-collapse:collapse; background:#fff; margin-bottom:24px; }}
  th, td {{ text-align:left; padding:8px; border-bottom:1px solid #e2e8f0; font-size:14px; }}
  th {{ color:#475569; }}
  section {{ background:#fff; border:1px solid #e2e8f0; border-radius:8px; padding:16px 20px; margin-bottom:16px; }}
  .empty {{ color:#94a3b8; }}
  footer {{ color:#94a3b8; font-size:12px; margin-top:24px; }}
</style>
</head>
<body>
<h1>{ticker} Analysis</h1>
<p class="sub">{marker} {label} &middot; Score {score:.1}/10 &middot; {source}</p>
{cards}
<h2>Financial Data</h2>
{table}
{sections}
<footer>Generated {generated}. Figures are synthetic and for demonstration only.</footer>
</body>
</html>
"#
        )
    }

    /// Headline numbers from the latest year.
    fn render_cards(&self) -> String {
        let Some(latest) = self.records.last() else {
            return String::new();
        };
        let cards = [
            (crores(latest.revenue), "Latest Revenue"),
            (format!("{}%", latest.opm), "Operating Margin"),
            (format!("₹{}", latest.eps), "Latest EPS"),
            (escape_html(&latest.peg_ratio), "PEG Ratio"),
        ];
        let body: String = cards
            .iter()
            .map(|(value, label)| {
                format!(
                    r#"  <div class="card"><div class="value">{value}</div><div class="label">{label}</div></div>
"#
                )
            })
            .collect();
        format!("<div class=\"cards\">\n{body}</div>")
    }

    fn render_table(&self) -> String {
        let head: String = Column::ALL
            .iter()
            .map(|c| format!("<th>{}</th>", c.header()))
            .collect();
        let rows: String = self
            .records
            .iter()
            .map(|record| {
                let cells: String = Column::ALL
                    .iter()
                    .map(|c| format!("<td>{}</td>", escape_html(&format_value(*c, record))))
                    .collect();
                format!("  <tr>{cells}</tr>\n")
            })
            .collect();
        format!("<table>\n  <tr>{head}</tr>\n{rows}</table>")
    }

    fn render_sections(&self) -> String {
        Section::ALL
            .iter()
            .map(|section| {
                format!(
                    "<section>\n<h3>{}</h3>\n{}</section>\n",
                    escape_html(section.title()),
                    insights_to_html(self.insights.get(*section))
                )
            })
            .collect()
    }
}
