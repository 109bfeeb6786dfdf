//! レスポンスエンベロープの組み立て
//!
//! カテゴリ別の解析結果とファイルサイズから、全カテゴリ共通の形を作る。
//! 画像なら `visual_analysis`、それ以外なら `content_analysis` のどちらか一方だけが入る。

use crate::error::Result;
use crate::metrics;
use crate::report;
use crate::types::{
    AnalysisEnvelope, CameraInfo, CategoryAnalysis, Dimensions, ExifMap, FileInfo, FileMetadata,
    Summary, VisualSection,
};
use serde_json::Value;

pub const EXTRACTION_METHOD: &str = "hybrid";

/// 画像のカラーモード（常にRGBとして報告する）
const IMAGE_MODE: &str = "RGB";

/// エンベロープを組み立てる
///
/// # Arguments
/// * `size_bytes` - アップロードされたファイルのバイト数
/// * `analysis` - カテゴリ別の解析結果
/// * `timestamp` - Unix秒（小数）
pub fn assemble_envelope(
    size_bytes: u64,
    analysis: CategoryAnalysis,
    timestamp: f64,
) -> Result<AnalysisEnvelope> {
    let csv_report = report::csv_report(&analysis)?;
    let size_mb = metrics::size_mb(size_bytes);
    let file_size = format!("{:.2} MB", size_mb);

    let envelope = match analysis {
        CategoryAnalysis::Image(findings) => {
            let format = findings.format_tag.to_uppercase();
            let has_exif = !findings.exif.is_empty();
            let camera_info = camera_info(&findings.exif);
            let description = findings.visual.description.clone();

            AnalysisEnvelope {
                success: true,
                timestamp,
                extraction_method: EXTRACTION_METHOD.to_string(),
                file_metadata: FileMetadata {
                    file_info: FileInfo {
                        format: format.clone(),
                        mode: Some(IMAGE_MODE.to_string()),
                        size_bytes,
                        size_mb,
                    },
                    dimensions: Some(Dimensions {
                        width: findings.width,
                        height: findings.height,
                        aspect_ratio: metrics::aspect_ratio(findings.width, findings.height),
                        megapixels: metrics::megapixels(findings.width, findings.height),
                    }),
                    exif: Some(findings.exif),
                    camera_info: Some(camera_info),
                },
                visual_analysis: Some(VisualSection {
                    ai_analysis: findings.visual,
                }),
                content_analysis: None,
                csv_report,
                summary: Summary {
                    format,
                    dimensions: Some(format!("{}x{}", findings.width, findings.height)),
                    file_size,
                    has_exif,
                    ai_generated: false,
                    ai_description: Some(description),
                },
            }
        }
        CategoryAnalysis::Content(content) => {
            let format = content
                .category()
                .format_label()
                .unwrap_or_default()
                .to_string();

            AnalysisEnvelope {
                success: true,
                timestamp,
                extraction_method: EXTRACTION_METHOD.to_string(),
                file_metadata: FileMetadata {
                    file_info: FileInfo {
                        format: format.clone(),
                        mode: None,
                        size_bytes,
                        size_mb,
                    },
                    dimensions: None,
                    exif: None,
                    camera_info: None,
                },
                visual_analysis: None,
                content_analysis: Some(content),
                csv_report,
                summary: Summary {
                    format,
                    dimensions: None,
                    file_size,
                    has_exif: false,
                    ai_generated: false,
                    ai_description: None,
                },
            }
        }
    };

    Ok(envelope)
}

/// EXIFからMake/Model/Softwareを取り出す（なければ空文字列）
pub fn camera_info(exif: &ExifMap) -> CameraInfo {
    CameraInfo {
        make: exif_string(exif, "Make"),
        model: exif_string(exif, "Model"),
        software: exif_string(exif, "Software"),
    }
}

fn exif_string(exif: &ExifMap, key: &str) -> String {
    match exif.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
