//! モデル出力パーサー
//!
//! LLMの応答からコードフェンスを除去してJSONとして読み、
//! 画像解析・テキスト要約・表データ生成の各結果へ寛容にデコードする。
//! 期待するフィールドはすべて任意扱いで、型が合わなければ既定値に落とす。

use crate::error::{Error, Result};
use crate::types::{ColorSwatch, DetectedObject, VisualAnalysis};
use serde_json::{Map, Value};

/// 応答の前後にあるコードフェンスを除去
///
/// 除去対象:
/// 1. 先頭の ```（`json` タグ付きも可、大文字小文字は問わない）
/// 2. 末尾の ```
/// 3. 前後の空白
///
/// # Examples
/// ```
/// use extract_ai_common::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"x\":1}\n```"), "{\"x\":1}");
/// assert_eq!(strip_code_fences("  {\"x\":1}  "), "{\"x\":1}");
/// ```
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// フェンス除去後に厳密なJSONとしてパース（失敗は `Error::Parse`）
pub fn try_parse_model_json(raw: &str) -> Result<Value> {
    let json_str = strip_code_fences(raw);
    serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("model reply is not valid JSON: {}", e)))
}

/// フェンス除去後にパースし、失敗時は空オブジェクトを返す
pub fn parse_model_json(raw: &str) -> Value {
    try_parse_model_json(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// 画像解析の応答をデコード
///
/// 期待キー: image_description, objects_detected[{object, confidence}],
/// color_palette[{color, hex, percentage}], text[], confidence
pub fn decode_visual_analysis(reply: &Value) -> VisualAnalysis {
    let objects = array_field(reply, "objects_detected")
        .iter()
        .map(|o| DetectedObject {
            name: coerce_string(o.get("object")),
            confidence: coerce_number(o.get("confidence")).clamp(0.0, 1.0),
        })
        .collect();

    let colors = array_field(reply, "color_palette")
        .iter()
        .map(|c| ColorSwatch {
            name: coerce_string(c.get("color")),
            percentage: coerce_number(c.get("percentage")),
            hex: coerce_string(c.get("hex")),
        })
        .collect();

    let text = array_field(reply, "text")
        .iter()
        .filter(|t| is_scalar(t))
        .map(|t| coerce_string(Some(t)))
        .collect();

    VisualAnalysis {
        description: coerce_string(reply.get("image_description")),
        objects,
        colors,
        text,
        confidence: reply.get("confidence").and_then(Value::as_f64),
    }
}

/// テキスト要約の結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInsights {
    pub summary: String,
    pub key_phrases: Vec<String>,
}

/// テキスト要約の応答をデコード
///
/// JSONオブジェクトとして読めない場合は `None`（要約なしで続行する）
pub fn decode_text_insights(raw: &str) -> Option<TextInsights> {
    let reply = try_parse_model_json(raw).ok()?;
    if !reply.is_object() {
        return None;
    }

    Some(TextInsights {
        summary: coerce_string(reply.get("summary")),
        key_phrases: array_field(&reply, "key_phrases")
            .iter()
            .filter(|p| is_scalar(p))
            .map(|p| coerce_string(Some(p)))
            .collect(),
    })
}

/// 表データ生成の応答をデコード
///
/// `{"data": [[...], ...]}` 以外の形はすべて空配列
pub fn decode_generated_table(raw: &str) -> Vec<Vec<String>> {
    let reply = parse_model_json(raw);
    let Some(rows) = reply.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut table = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(cells) = row.as_array() else {
            return Vec::new();
        };
        table.push(cells.iter().map(|c| coerce_string(Some(c))).collect());
    }
    table
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}
