//! MIMEタイプ分類
//!
//! アップロード時に宣言されたContent-Typeを5つの排他カテゴリに振り分ける。
//! 該当なしは `None`（呼び出し側で415として扱う）。

use serde::{Deserialize, Serialize};

/// 解析対象のフォーマットカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatCategory {
    Image,
    Text,
    Json,
    Csv,
    Xml,
}

impl FormatCategory {
    /// 宣言MIMEタイプからカテゴリを判定
    ///
    /// `; charset=utf-8` などのパラメータは無視し、大文字小文字も区別しない。
    ///
    /// # Examples
    /// ```
    /// use extract_ai_common::FormatCategory;
    ///
    /// assert_eq!(FormatCategory::from_mime("image/png"), Some(FormatCategory::Image));
    /// assert_eq!(FormatCategory::from_mime("text/csv; charset=utf-8"), Some(FormatCategory::Csv));
    /// assert_eq!(FormatCategory::from_mime("application/pdf"), None);
    /// ```
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = normalize_mime(mime);
        match essence.as_str() {
            "" => None,
            m if m.starts_with("image/") => Some(Self::Image),
            "text/plain" => Some(Self::Text),
            "application/json" | "application/ld+json" => Some(Self::Json),
            "text/csv" | "application/vnd.ms-excel" => Some(Self::Csv),
            "application/xml" | "text/xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// レポート上のフォーマット表記（画像はデコード結果のタグを使うため `None`）
    pub fn format_label(&self) -> Option<&'static str> {
        match self {
            Self::Image => None,
            Self::Text => Some("TXT"),
            Self::Json => Some("JSON"),
            Self::Csv => Some("CSV"),
            Self::Xml => Some("XML"),
        }
    }
}

/// 5カテゴリのフラグ表現（最大1つだけtrue）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MimeFlags {
    pub is_image: bool,
    pub is_text: bool,
    pub is_json: bool,
    pub is_csv: bool,
    pub is_xml: bool,
}

impl MimeFlags {
    pub fn from_mime(mime: &str) -> Self {
        let category = FormatCategory::from_mime(mime);
        Self {
            is_image: category == Some(FormatCategory::Image),
            is_text: category == Some(FormatCategory::Text),
            is_json: category == Some(FormatCategory::Json),
            is_csv: category == Some(FormatCategory::Csv),
            is_xml: category == Some(FormatCategory::Xml),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.is_image || self.is_text || self.is_json || self.is_csv || self.is_xml
    }
}

/// パラメータを除いた小文字のMIME本体
fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}
