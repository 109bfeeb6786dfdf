//! 解析パイプライン
//!
//! アップロード → MIME分類 → カテゴリ別解析 → エンベロープ組み立て。
//! 1リクエスト内の処理は逐次で、LLM呼び出しは画像・テキストのみ最大1回。

mod image;
mod text;

pub use self::image::{analyze_image, to_data_url};
pub use self::text::analyze_text_with_summary;

use crate::error::{ExtractAiError, Result};
use crate::llm::ChatProvider;
use extract_ai_common::{
    analyze_local, assemble_envelope, AnalysisEnvelope, CategoryAnalysis, ContentAnalysis,
    FormatCategory,
};
use std::path::Path;

/// アップロードされた1ファイル（リクエスト終了で破棄）
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl UploadedFile {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name,
        }
    }

    /// ファイルを読み、MIMEタイプ（指定がなければ拡張子から推定）を付ける
    pub fn from_path(path: &Path, mime: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = match mime {
            Some(m) => m.to_string(),
            None => mime_guess::from_path(path)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());

        Ok(Self::new(bytes, mime_type, file_name))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn category(&self) -> Option<FormatCategory> {
        FormatCategory::from_mime(&self.mime_type)
    }
}

/// 1ファイルを解析してエンベロープを返す
///
/// APIキーの確認は呼び出し側で済ませておくこと。
pub async fn analyze_upload(
    file: &UploadedFile,
    provider: &dyn ChatProvider,
) -> Result<AnalysisEnvelope> {
    let category = file
        .category()
        .ok_or_else(|| ExtractAiError::UnsupportedMediaType(file.mime_type.clone()))?;

    tracing::info!(
        file = file.file_name.as_deref().unwrap_or("-"),
        mime = %file.mime_type,
        size = file.bytes.len(),
        ?category,
        "analyzing upload"
    );

    let analysis = match category {
        FormatCategory::Image => {
            CategoryAnalysis::Image(analyze_image(&file.bytes, &file.mime_type, provider).await?)
        }
        FormatCategory::Text => CategoryAnalysis::Content(ContentAnalysis::Text(
            analyze_text_with_summary(&file.bytes, provider).await,
        )),
        FormatCategory::Json | FormatCategory::Csv | FormatCategory::Xml => {
            analyze_local(category, &file.bytes)
                .map(CategoryAnalysis::Content)
                .ok_or_else(|| ExtractAiError::UnsupportedMediaType(file.mime_type.clone()))?
        }
    };

    Ok(assemble_envelope(file.size_bytes(), analysis, unix_timestamp())?)
}

/// 現在時刻（Unix秒、ミリ秒精度の小数）
pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
