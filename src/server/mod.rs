//! HTTPサーバー
//!
//! - POST /api/analyze-image : multipartの `image` フィールドを解析
//! - POST /api/generate-data : 表データ生成
//! - GET  /health            : 死活確認

mod handlers;

use crate::config::Config;
use crate::error::{ExtractAiError, Result};
use crate::llm::{ChatProvider, GroqClient};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// アップロードファイルの上限
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// multipartの境界やヘッダーの分だけ余裕を持たせたボディ上限
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// リクエスト間で共有する状態（起動後は読み取り専用）
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    provider: Option<Arc<dyn ChatProvider>>,
}

impl AppState {
    /// 設定からGroqクライアントを作る（APIキー未設定ならプロバイダなしで起動）
    pub fn from_config(config: Config) -> Result<Self> {
        let provider: Option<Arc<dyn ChatProvider>> = if config.has_api_key() {
            Some(Arc::new(GroqClient::from_config(&config)?))
        } else {
            tracing::warn!("GROQ_API_KEY is not set; analysis requests will fail with 500");
            None
        };

        Ok(Self {
            config: Arc::new(config),
            provider,
        })
    }

    pub fn with_provider(config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider: Some(provider),
        }
    }

    /// APIキーを確認してからプロバイダを返す
    pub fn provider(&self) -> Result<&dyn ChatProvider> {
        self.config.require_api_key()?;
        self.provider.as_deref().ok_or(ExtractAiError::MissingApiKey)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/analyze-image", post(handlers::analyze_image))
        .route("/api/generate-data", post(handlers::generate_data))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// 指定アドレスで待ち受けて処理を続ける
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        model = %state.config.model,
        origins = ?state.config.cors_origins,
        "server listening"
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
