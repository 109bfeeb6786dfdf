//! 画像以外のローカル解析（テキスト/JSON/CSV/XML）
//!
//! どの解析も入力が壊れていても失敗しない。パースできなければ
//! `parse_ok: false` などの既定値を返す。

pub mod csv;
pub mod json;
pub mod text;
pub mod xml;

use crate::mime::FormatCategory;
use crate::types::ContentAnalysis;

pub use self::csv::analyze_csv;
pub use self::json::analyze_json;
pub use self::text::analyze_text;
pub use self::xml::analyze_xml;

/// カテゴリに応じたローカル解析（画像は対象外なので `None`）
pub fn analyze_local(category: FormatCategory, bytes: &[u8]) -> Option<ContentAnalysis> {
    match category {
        FormatCategory::Image => None,
        FormatCategory::Text => Some(ContentAnalysis::Text(analyze_text(bytes))),
        FormatCategory::Json => Some(ContentAnalysis::Json(analyze_json(bytes))),
        FormatCategory::Csv => Some(ContentAnalysis::Csv(analyze_csv(bytes))),
        FormatCategory::Xml => Some(ContentAnalysis::Xml(analyze_xml(bytes))),
    }
}
