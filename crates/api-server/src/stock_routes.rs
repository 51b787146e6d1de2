//! Stock API Routes
//!
//! Sample tickers, synthetic financials, full analysis and the HTML report.

use analysis_core::{FinancialRecord, InsightSource};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use insight_orchestrator::StockAnalysis;
use llm_client::model_label;
use report_export::{report_filename, FinancialReport};
use serde::Serialize;

use crate::request_id::RequestId;
use crate::{ApiResponse, AppError, AppState};

/// Quick-pick tickers offered next to the search box.
pub const SAMPLE_TICKERS: [&str; 10] = [
    "TCS",
    "RELIANCE",
    "INFY",
    "HDFC",
    "CDSL",
    "ITC",
    "SBI",
    "WIPRO",
    "MARUTI",
    "ASIANPAINT",
];

#[derive(Serialize)]
pub struct FinancialsResponse {
    pub ticker: String,
    pub records: Vec<FinancialRecord>,
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/samples", get(get_samples))
        .route("/api/stocks/:ticker/financials", get(get_financials))
        .route("/api/stocks/:ticker/analysis", get(get_analysis))
        .route("/api/stocks/:ticker/report", get(get_report))
}

async fn get_samples() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(SAMPLE_TICKERS.to_vec()))
}

async fn get_financials(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<FinancialsResponse>>, AppError> {
    let (ticker, records) = state.analyzer.financials(&ticker)?;
    Ok(Json(ApiResponse::success(FinancialsResponse { ticker, records })))
}

async fn get_analysis(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<StockAnalysis>>, AppError> {
    let analysis = state.analyzer.analyze(&ticker).await?;
    if let Some(notice) = &analysis.notice {
        tracing::warn!(request_id = %request_id.0, "{}", notice);
    }
    Ok(Json(ApiResponse::success(analysis)))
}

fn source_label(source: &InsightSource) -> String {
    match source {
        InsightSource::Remote { model } => {
            format!("AI insights: {}", model_label(model).unwrap_or(model.as_str()))
        }
        InsightSource::Local => "Detailed local analysis".to_string(),
    }
}

async fn get_report(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Response, AppError> {
    let analysis = state.analyzer.analyze(&ticker).await?;

    let html = FinancialReport {
        ticker: &analysis.ticker,
        records: &analysis.records,
        insights: &analysis.insights,
        score: analysis.sentiment.score,
        recommendation: analysis.sentiment.recommendation,
        source_label: source_label(&analysis.source),
        generated_at: Utc::now(),
    }
    .render();

    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_filename(&analysis.ticker)
    );
    tracing::info!("Exported report for {}", analysis.ticker);

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}
