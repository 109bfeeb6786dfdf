//! JSON構造解析

use crate::types::JsonAnalysis;
use serde_json::Value;

/// JSONをパースしてルート型・キー数・深さを求める
///
/// パース失敗時は `parse_ok: false`, `root_type: "invalid"`
///
/// serde_json の再帰上限（128段）を超える入力もパース失敗として扱う。
pub fn analyze_json(bytes: &[u8]) -> JsonAnalysis {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => JsonAnalysis {
            parse_ok: true,
            root_type: root_type(&value).to_string(),
            keys_count: value.as_object().map_or(0, |m| m.len()),
            depth: depth(&value),
        },
        Err(_) => JsonAnalysis {
            parse_ok: false,
            root_type: "invalid".to_string(),
            keys_count: 0,
            depth: 0,
        },
    }
}

/// ルート値の型名
pub fn root_type(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// 最大ネスト深さ（ルート=1）
///
/// オブジェクト/配列だけを辿る。スカラー値は親より深くならない。
///
/// # Examples
/// ```
/// use extract_ai_common::content::json::depth;
///
/// let value = serde_json::json!({"a": {"b": {"c": 1}}});
/// assert_eq!(depth(&value), 3);
/// ```
pub fn depth(value: &Value) -> usize {
    let mut deepest = 1;
    let mut pending = vec![(value, 1)];
    while let Some((current, level)) = pending.pop() {
        deepest = deepest.max(level);
        match current {
            Value::Object(map) => pending.extend(
                map.values().filter(|c| is_container(c)).map(|c| (c, level + 1)),
            ),
            Value::Array(items) => pending.extend(
                items.iter().filter(|c| is_container(c)).map(|c| (c, level + 1)),
            ),
            _ => {}
        }
    }
    deepest
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object_depth() {
        let analysis = analyze_json(br#"{"a":{"b":{"c":1}}}"#);
        assert!(analysis.parse_ok);
        assert_eq!(analysis.root_type, "object");
        assert_eq!(analysis.keys_count, 1);
        assert_eq!(analysis.depth, 3);
    }

    #[test]
    fn test_array_root() {
        let analysis = analyze_json(br#"[1, [2, [3]], {"k": []}]"#);
        assert_eq!(analysis.root_type, "array");
        assert_eq!(analysis.keys_count, 0);
        assert_eq!(analysis.depth, 3);
    }

    #[test]
    fn test_scalar_roots() {
        assert_eq!(analyze_json(b"42").root_type, "number");
        assert_eq!(analyze_json(br#""hi""#).root_type, "string");
        assert_eq!(analyze_json(b"true").root_type, "boolean");
        assert_eq!(analyze_json(b"null").root_type, "null");
        assert_eq!(analyze_json(b"42").depth, 1);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(depth(&json!({})), 1);
        assert_eq!(depth(&json!([])), 1);
        assert_eq!(depth(&json!({"a": {}})), 2);
    }

    #[test]
    fn test_invalid_json() {
        let analysis = analyze_json(b"{not json");
        assert!(!analysis.parse_ok);
        assert_eq!(analysis.root_type, "invalid");
        assert_eq!(analysis.keys_count, 0);
        assert_eq!(analysis.depth, 0);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(!analyze_json(b"").parse_ok);
    }

    #[test]
    fn test_nesting_past_recursion_limit() {
        let deep = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        let analysis = analyze_json(deep.as_bytes());
        assert!(!analysis.parse_ok);
        assert_eq!(analysis.root_type, "invalid");

        let within = format!("{}{}", "[".repeat(100), "]".repeat(100));
        let analysis = analyze_json(within.as_bytes());
        assert!(analysis.parse_ok);
        assert_eq!(analysis.depth, 100);
    }

    #[test]
    fn test_keys_count_top_level_only() {
        let analysis = analyze_json(br#"{"a": 1, "b": {"c": 2, "d": 3}, "e": null}"#);
        assert_eq!(analysis.keys_count, 3);
        assert_eq!(analysis.depth, 2);
    }
}
