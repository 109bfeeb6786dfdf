//! プロンプト生成モジュール
//!
//! サーバーとCLIで共有されるプロンプト:
//! - IMAGE_SYSTEM_PROMPT: 画像解析（厳密JSON）
//! - TEXT_SUMMARY_SYSTEM_PROMPT: テキスト要約（2文 + キーフレーズ5つ）
//! - build_generate_data_prompt: 表データ生成

use serde_json::Value;

/// 画像解析のシステム指示
pub const IMAGE_SYSTEM_PROMPT: &str = "Return STRICT JSON describing the image ONLY. \
Include: image_description, objects_detected[{object,confidence}], \
color_palette[{color,hex,percentage}], text[], confidence. JSON only.";

/// 画像解析のユーザー指示
pub const IMAGE_USER_PROMPT: &str = "Analyze this image.";

/// テキスト要約のシステム指示
pub const TEXT_SUMMARY_SYSTEM_PROMPT: &str = "Summarize in 2 sentences and 5 key phrases. \
JSON: {\"summary\":\"...\",\"key_phrases\":[\"...\"]} only.";

/// 要約に渡す本文の上限（文字数）
pub const TEXT_SUMMARY_INPUT_LIMIT: usize = 10_000;

/// 要約用に本文を切り詰める
pub fn truncate_for_summary(text: &str) -> &str {
    match text.char_indices().nth(TEXT_SUMMARY_INPUT_LIMIT) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// 表データ生成プロンプト
///
/// # Arguments
/// * `horizontal_headers` - 列見出し
/// * `vertical_headers` - 行見出し
/// * `data_types` - 列ごとの型ヒント（なければ `{}`）
pub fn build_generate_data_prompt(
    horizontal_headers: &[Value],
    vertical_headers: &[Value],
    data_types: Option<&Value>,
) -> String {
    let empty = Value::Object(Default::default());
    let types = data_types.filter(|t| !t.is_null()).unwrap_or(&empty);

    [
        "Generate a 2D array of strings representing a table.".to_string(),
        format!("Columns: {}", Value::from(horizontal_headers.to_vec())),
        format!("Rows: {}", Value::from(vertical_headers.to_vec())),
        format!("Types: {}", types),
        "Return STRICT JSON: {\"data\": [[\"cell11\",\"cell12\",...],[...], ...]} with length matching rows and columns.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_prompt_lists_every_key() {
        for key in ["image_description", "objects_detected", "color_palette", "text[]", "confidence"] {
            assert!(IMAGE_SYSTEM_PROMPT.contains(key), "{}", key);
        }
    }

    #[test]
    fn test_truncate_for_summary() {
        assert_eq!(truncate_for_summary("short"), "short");

        let long: String = "あ".repeat(TEXT_SUMMARY_INPUT_LIMIT + 5);
        let truncated = truncate_for_summary(&long);
        assert_eq!(truncated.chars().count(), TEXT_SUMMARY_INPUT_LIMIT);
    }

    #[test]
    fn test_generate_data_prompt() {
        let prompt = build_generate_data_prompt(
            &[json!("Name"), json!("Age")],
            &[json!("Row1")],
            Some(&json!({"Age": "number"})),
        );
        assert!(prompt.contains(r#"Columns: ["Name","Age"]"#));
        assert!(prompt.contains(r#"Rows: ["Row1"]"#));
        assert!(prompt.contains(r#"Types: {"Age":"number"}"#));
        assert!(prompt.contains("Return STRICT JSON"));
        assert_eq!(prompt.lines().count(), 5);
    }

    #[test]
    fn test_generate_data_prompt_without_types() {
        let prompt = build_generate_data_prompt(&[json!("A")], &[json!("1")], None);
        assert!(prompt.contains("Types: {}"));

        let prompt = build_generate_data_prompt(&[json!("A")], &[json!("1")], Some(&Value::Null));
        assert!(prompt.contains("Types: {}"));
    }
}
