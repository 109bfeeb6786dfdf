use super::{AppState, MAX_UPLOAD_BYTES};
use crate::analyzer::{analyze_upload, UploadedFile};
use crate::error::{ExtractAiError, Result};
use crate::generator::{generate_table, GenerateDataRequest, GenerateDataResponse};
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use extract_ai_common::AnalysisEnvelope;
use serde_json::{json, Value};

/// ファイルを受け取るmultipartフィールド名
const UPLOAD_FIELD: &str = "image";

/// Content-Typeのないパートの扱い
const FALLBACK_MIME: &str = "application/octet-stream";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/analyze-image
///
/// 検査順: ファイルなし(400) → APIキーなし(500) → 非対応MIME(415) → サイズ超過(413)
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisEnvelope>> {
    // multipartでないリクエストは「ファイルなし」と同じ扱い
    let Ok(multipart) = multipart else {
        return Err(ExtractAiError::NoFile);
    };
    let file = read_upload(multipart).await?.ok_or(ExtractAiError::NoFile)?;

    let provider = state.provider()?;

    if file.category().is_none() {
        return Err(ExtractAiError::UnsupportedMediaType(file.mime_type));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(too_large());
    }

    let envelope = analyze_upload(&file, provider).await?;
    Ok(Json(envelope))
}

/// POST /api/generate-data
///
/// 検査順: JSONでない(400) → 見出しが配列でない(400) → APIキーなし(500)
pub async fn generate_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateDataResponse>> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).map_err(|e| ExtractAiError::InvalidBody(e.to_string()))?
    };

    if !value.is_object() {
        return Err(ExtractAiError::InvalidHeaders);
    }
    let request: GenerateDataRequest =
        serde_json::from_value(value).map_err(|e| ExtractAiError::InvalidBody(e.to_string()))?;
    let spec = request.validate()?;

    let provider = state.provider()?;
    let response = generate_table(&spec, provider).await?;
    Ok(Json(response))
}

/// `image` フィールドを探して読み込む（他のフィールドは読み捨てる）
async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();
        let file_name = field.file_name().map(String::from);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(UploadedFile::new(bytes.to_vec(), mime_type, file_name)));
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> ExtractAiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        ExtractAiError::InvalidBody(e.body_text())
    }
}

fn too_large() -> ExtractAiError {
    ExtractAiError::FileTooLarge {
        limit_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
    }
}
