use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractAiError {
    #[error("No image provided")]
    NoFile,

    #[error("Missing GROQ_API_KEY")]
    MissingApiKey,

    #[error("Unsupported media type. Allowed: image, txt, json, csv, xml.")]
    UnsupportedMediaType(String),

    #[error("File too large. Maximum size is {limit_mb} MB")]
    FileTooLarge { limit_mb: usize },

    #[error("Invalid headers")]
    InvalidHeaders,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("画像読み込みエラー: {0}")]
    ImageDecode(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("ストリーム読み込みエラー: {0}")]
    ApiStream(String),

    #[error(transparent)]
    Common(#[from] extract_ai_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractAiError {
    /// HTTPステータスへの対応
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFile
            | Self::InvalidHeaders
            | Self::InvalidBody(_)
            | Self::ImageDecode(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingApiKey
            | Self::Config(_)
            | Self::ApiCall(_)
            | Self::ApiStream(_)
            | Self::Common(_)
            | Self::JsonParse(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ExtractAiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ExtractAiError>;
