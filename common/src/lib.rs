//! Extract AI Common Library
//!
//! サーバーとCLIで共有される解析ロジック（I/Oなし）
//! - MIME分類、テキスト/JSON/CSV/XMLの構造解析
//! - モデル出力のサニタイズとデコード
//! - CSVレポートとレスポンスエンベロープの組み立て

pub mod content;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod mime;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod types;

pub use content::analyze_local;
pub use envelope::assemble_envelope;
pub use error::{Error, Result};
pub use mime::{FormatCategory, MimeFlags};
pub use parser::{
    decode_generated_table, decode_text_insights, decode_visual_analysis, parse_model_json,
    strip_code_fences, try_parse_model_json, TextInsights,
};
pub use report::{combine_csv_reports, csv_report, export_json_payload};
pub use types::{
    AnalysisEnvelope, CategoryAnalysis, ContentAnalysis, ExifMap, ImageFindings, VisualAnalysis,
};
