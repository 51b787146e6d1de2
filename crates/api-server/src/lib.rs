use std::net::SocketAddr;
use std::sync::Arc;

use analysis_core::AnalysisError;
use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use insight_orchestrator::StockAnalyzer;
use llm_client::{
    FileSettingsStore, LlmConfig, MemorySettingsStore, OpenRouterClient, SettingsError,
    SettingsStore,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod request_id;
pub mod security_headers;
pub mod settings_routes;
pub mod stock_routes;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<StockAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: StockAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Envelope for every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error: a status code plus the underlying cause.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.error);
        } else {
            tracing::debug!("Request rejected ({}): {}", self.status, self.error);
        }
        let body = Json(ApiResponse::<()>::error(self.error.to_string()));
        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let status = match error {
            AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::RemoteError(_) => StatusCode::BAD_GATEWAY,
        };
        Self::with_status(status, error.into())
    }
}

impl From<SettingsError> for AppError {
    fn from(error: SettingsError) -> Self {
        let status = match error {
            SettingsError::MissingApiKey
            | SettingsError::InvalidApiKey(_)
            | SettingsError::UnknownModel(_) => StatusCode::BAD_REQUEST,
            SettingsError::NoConfigDir | SettingsError::Io(_) | SettingsError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::with_status(status, error.into())
    }
}

/// Listener and CORS settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SERVER_PORT '{}': {}", raw, e))?,
            None => 3000,
        };
        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            cors_origins,
        })
    }

    /// Configured origins that are valid header values; the rest are logged and skipped.
    fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {:?}", o);
                    None
                }
            })
            .collect()
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::PUT, Method::DELETE])
            .allow_headers(Any);
        if self.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }
        layer.allow_origin(self.allowed_origins())
    }
}

async fn health() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// All routes and middleware, without CORS (which depends on deployment config).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(stock_routes::stock_routes())
        .merge(settings_routes::settings_routes())
        .layer(middleware::from_fn(security_headers::security_headers_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_tracing() {
    let json_logging = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn settings_store() -> Arc<dyn SettingsStore> {
    match FileSettingsStore::from_env() {
        Ok(store) => {
            tracing::info!("Settings file: {}", store.path().display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("{}; settings will not persist across restarts", e);
            Arc::new(MemorySettingsStore::new())
        }
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting Stock Insight API server");

    let config = ServerConfig::from_env()?;
    let llm_config = LlmConfig::from_env();
    tracing::info!("Chat completions endpoint: {}", llm_config.base_url);

    let chat = Arc::new(OpenRouterClient::new(llm_config)?);
    let analyzer = StockAnalyzer::new(chat, settings_store());
    let app = build_router(AppState::new(analyzer)).layer(config.cors_layer());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use llm_client::StoredSettings;
    use tower::ServiceExt;

    /// Router whose chat endpoint is unreachable, so remote calls always fail.
    pub fn app_with(settings: StoredSettings) -> (Router, Arc<MemorySettingsStore>) {
        let store = Arc::new(MemorySettingsStore::with_settings(settings));
        let config = LlmConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..LlmConfig::default()
        };
        let chat = Arc::new(OpenRouterClient::new(config).unwrap());
        let analyzer = StockAnalyzer::new(chat, store.clone());
        (build_router(AppState::new(analyzer)), store)
    }

    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    pub fn json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }
}
