//! テキスト解析

use crate::types::TextAnalysis;
use std::borrow::Cow;

/// UTF-8として読む（不正なバイト列は置換文字に）
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// 文字数・単語数・行数を数える
///
/// - 文字数: UTF-16コードユニット数
/// - 単語数: 空白区切りの空でないトークン数
/// - 行数: 改行（`\n` / `\r\n`）で区切ったセグメント数（空文字列は1行）
pub fn analyze_text(bytes: &[u8]) -> TextAnalysis {
    let text = decode_text(bytes);

    TextAnalysis {
        character_count: text.encode_utf16().count(),
        word_count: text.split_whitespace().count(),
        line_count: text.split('\n').count(),
        summary: None,
        key_phrases: None,
    }
}
