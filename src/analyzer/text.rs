use crate::llm::{ChatMessage, ChatProvider, ChatRequest};
use extract_ai_common::content::text::{analyze_text, decode_text};
use extract_ai_common::prompts::{truncate_for_summary, TEXT_SUMMARY_SYSTEM_PROMPT};
use extract_ai_common::types::TextAnalysis;
use extract_ai_common::decode_text_insights;

const SUMMARY_TEMPERATURE: f32 = 0.3;

/// 文字数などの集計 + LLMによる要約
///
/// 要約は付加情報なので、呼び出し失敗やパース失敗では `summary`/`key_phrases` を省くだけ。
pub async fn analyze_text_with_summary(bytes: &[u8], provider: &dyn ChatProvider) -> TextAnalysis {
    let mut analysis = analyze_text(bytes);
    let text = decode_text(bytes);

    let request = ChatRequest::new(
        provider.model(),
        vec![
            ChatMessage::system(TEXT_SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(truncate_for_summary(&text)),
        ],
    )
    .temperature(SUMMARY_TEMPERATURE);

    match provider.complete(&request).await {
        Ok(raw) => match decode_text_insights(&raw) {
            Some(insights) => {
                analysis.summary = Some(insights.summary);
                analysis.key_phrases = Some(insights.key_phrases);
            }
            None => tracing::warn!("text summary reply was not a JSON object; omitting summary"),
        },
        Err(e) => tracing::warn!(error = %e, "text summary failed; omitting summary"),
    }

    analysis
}
