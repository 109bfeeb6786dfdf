//! 解析結果の型定義
//!
//! サーバーとCLIで共有される型:
//! - VisualAnalysis: 画像のAI解析結果（モデル出力を寛容にデコードしたもの）
//! - ContentAnalysis: テキスト/JSON/CSV/XMLの構造解析結果
//! - AnalysisEnvelope: 全カテゴリ共通のレスポンス形

use crate::mime::FormatCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// EXIFなど埋め込みメタデータ（キーはタグ名: Make, Model, Software ...）
pub type ExifMap = BTreeMap<String, serde_json::Value>;

/// 検出オブジェクト
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    /// 0.0〜1.0
    pub confidence: f64,
}

/// カラーパレットの1色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub name: String,
    pub percentage: f64,
    pub hex: String,
}

/// 画像のAI解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub description: String,
    pub objects: Vec<DetectedObject>,
    pub colors: Vec<ColorSwatch>,
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// 画像ブランチの出力一式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFindings {
    /// デコード時のフォーマットタグ（jpg, png, ...）
    pub format_tag: String,
    pub width: u32,
    pub height: u32,
    pub exif: ExifMap,
    pub visual: VisualAnalysis,
}

/// テキストの解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_phrases: Option<Vec<String>>,
}

/// JSONの解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonAnalysis {
    pub parse_ok: bool,
    pub root_type: String,
    pub keys_count: usize,
    pub depth: usize,
}

/// CSVの解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvAnalysis {
    pub rows: usize,
    pub columns: usize,
    pub headers: Vec<String>,
    /// レポート用の先頭データ行（最大5行、ヘッダー順に整列済み）
    #[serde(skip)]
    pub sample_rows: Vec<Vec<String>>,
}

/// XMLの解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XmlAnalysis {
    pub parse_ok: bool,
    pub root: String,
    pub depth: usize,
}

/// 画像以外のカテゴリの解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentAnalysis {
    Text(TextAnalysis),
    Json(JsonAnalysis),
    Csv(CsvAnalysis),
    Xml(XmlAnalysis),
}

impl ContentAnalysis {
    pub fn category(&self) -> FormatCategory {
        match self {
            Self::Text(_) => FormatCategory::Text,
            Self::Json(_) => FormatCategory::Json,
            Self::Csv(_) => FormatCategory::Csv,
            Self::Xml(_) => FormatCategory::Xml,
        }
    }
}

/// カテゴリ別の解析結果（エンベロープ組み立ての入力）
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryAnalysis {
    Image(ImageFindings),
    Content(ContentAnalysis),
}

impl CategoryAnalysis {
    pub fn category(&self) -> FormatCategory {
        match self {
            Self::Image(_) => FormatCategory::Image,
            Self::Content(content) => content.category(),
        }
    }
}

// =============================================
// レスポンスエンベロープ
// =============================================

/// 全カテゴリ共通のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    /// Unix秒（小数）
    pub timestamp: f64,
    pub extraction_method: String,
    pub file_metadata: FileMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_analysis: Option<VisualSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
    pub csv_report: String,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_info: FileInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_info: Option<CameraInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub size_bytes: u64,
    pub size_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
    pub megapixels: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub make: String,
    pub model: String,
    pub software: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSection {
    pub ai_analysis: VisualAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    pub file_size: String,
    pub has_exif: bool,
    pub ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_analysis_serializes_flat() {
        let analysis = ContentAnalysis::Json(JsonAnalysis {
            parse_ok: true,
            root_type: "object".to_string(),
            keys_count: 2,
            depth: 3,
        });
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"parse_ok": true, "root_type": "object", "keys_count": 2, "depth": 3})
        );
    }

    #[test]
    fn test_text_analysis_omits_missing_summary() {
        let analysis = TextAnalysis {
            character_count: 5,
            word_count: 1,
            line_count: 1,
            ..Default::default()
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("summary").is_none());
        assert!(value.get("key_phrases").is_none());
    }

    #[test]
    fn test_csv_sample_rows_not_serialized() {
        let analysis = CsvAnalysis {
            rows: 1,
            columns: 1,
            headers: vec!["a".to_string()],
            sample_rows: vec![vec!["1".to_string()]],
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("sample_rows").is_none());
    }

    #[test]
    fn test_visual_confidence_optional() {
        let visual = VisualAnalysis::default();
        let value = serde_json::to_value(&visual).unwrap();
        assert!(value.get("confidence").is_none());
        assert_eq!(value["objects"], serde_json::json!([]));
    }

    #[test]
    fn test_category_of_analysis() {
        let content = CategoryAnalysis::Content(ContentAnalysis::Xml(XmlAnalysis::default()));
        assert_eq!(content.category(), FormatCategory::Xml);
        let image = CategoryAnalysis::Image(ImageFindings::default());
        assert_eq!(image.category(), FormatCategory::Image);
    }
}
