//! Settings API Routes
//!
//! API key and model selection. The key is never echoed back unmasked.

use axum::{extract::State, routing::get, Json, Router};
use llm_client::{
    mask_api_key, model_label, validate_api_key, validate_model, ModelOption, StoredSettings,
    AVAILABLE_MODELS, DEFAULT_MODEL,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub configured: bool,
    pub masked_key: Option<String>,
    pub model: String,
    pub model_label: Option<&'static str>,
}

impl From<&StoredSettings> for SettingsView {
    fn from(settings: &StoredSettings) -> Self {
        let masked_key = settings
            .openrouter_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(mask_api_key);
        let model = settings.model().to_string();
        Self {
            configured: masked_key.is_some(),
            model_label: model_label(&model),
            masked_key,
            model,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/models", get(get_models))
        .route(
            "/api/settings",
            get(get_settings).put(put_settings).delete(delete_settings),
        )
}

async fn get_models() -> Json<ApiResponse<&'static [ModelOption]>> {
    Json(ApiResponse::success(AVAILABLE_MODELS))
}

async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SettingsView>>, AppError> {
    let settings = state.analyzer.settings().load().await?;
    Ok(Json(ApiResponse::success(SettingsView::from(&settings))))
}

async fn put_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsView>>, AppError> {
    // Validate everything before touching the store
    let api_key = validate_api_key(&req.api_key)?;
    let model = validate_model(req.model.as_deref().unwrap_or(DEFAULT_MODEL))?;

    let settings = StoredSettings {
        openrouter_api_key: Some(api_key),
        openrouter_model: Some(model),
    };
    state.analyzer.settings().save(&settings).await?;
    tracing::info!("API key configured for model {}", settings.model());

    Ok(Json(ApiResponse::success(SettingsView::from(&settings))))
}

async fn delete_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SettingsView>>, AppError> {
    state.analyzer.settings().clear().await?;
    tracing::info!("API key removed");
    Ok(Json(ApiResponse::success(SettingsView::from(
        &StoredSettings::default(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_with, json, send};
    use axum::http::StatusCode;
    use llm_client::SettingsStore;
    use serde_json::json as j;

    #[tokio::test]
    async fn test_models_catalogue() {
        let (app, _) = app_with(StoredSettings::default());
        let (status, _, body) = send(app, "GET", "/api/models", None).await;
        assert_eq!(status, StatusCode::OK);
        let value = json(&body);
        assert_eq!(value["data"].as_array().unwrap().len(), 5);
        assert_eq!(value["data"][0]["id"], "deepseek/deepseek-r1");
    }

    #[tokio::test]
    async fn test_get_unconfigured() {
        let (app, _) = app_with(StoredSettings::default());
        let (status, _, body) = send(app, "GET", "/api/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        let value = json(&body);
        assert_eq!(value["data"]["configured"], false);
        assert!(value["data"]["maskedKey"].is_null());
        assert_eq!(value["data"]["model"], "deepseek/deepseek-r1");
    }

    #[tokio::test]
    async fn test_put_saves_and_masks() {
        let (app, store) = app_with(StoredSettings::default());
        let (status, _, body) = send(
            app,
            "PUT",
            "/api/settings",
            Some(j!({"apiKey": "  sk-or-v1-abcdef123456  ", "model": "openai/gpt-4o"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value = json(&body);
        assert_eq!(value["data"]["configured"], true);
        assert_eq!(value["data"]["modelLabel"], "GPT-4o");
        assert!(!value.to_string().contains("abcdef123456"));

        let stored = store.load().await.unwrap();
        assert_eq!(stored.openrouter_api_key.as_deref(), Some("sk-or-v1-abcdef123456"));
        assert_eq!(stored.openrouter_model.as_deref(), Some("openai/gpt-4o"));
    }

    #[tokio::test]
    async fn test_put_rejects_bad_key_without_saving() {
        let (app, store) = app_with(StoredSettings::default());
        let (status, _, body) = send(
            app,
            "PUT",
            "/api/settings",
            Some(j!({"apiKey": "sk-wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&body)["error"].as_str().unwrap().contains("sk-or-v1-"));
        assert_eq!(store.load().await.unwrap(), StoredSettings::default());
    }

    #[tokio::test]
    async fn test_put_rejects_unknown_model() {
        let (app, _) = app_with(StoredSettings::default());
        let (status, _, _) = send(
            app,
            "PUT",
            "/api/settings",
            Some(j!({"apiKey": "sk-or-v1-abc", "model": "nope/model"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_clears() {
        let (app, store) = app_with(StoredSettings {
            openrouter_api_key: Some("sk-or-v1-abc".to_string()),
            openrouter_model: Some("openai/gpt-4o".to_string()),
        });
        let (status, _, body) = send(app, "DELETE", "/api/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["configured"], false);
        assert!(store.load().await.unwrap().credentials().is_none());
    }
}
