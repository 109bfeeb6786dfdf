use crate::error::Result;
use crate::llm::{ChatMessage, ChatProvider, ChatRequest};
use crate::scanner::{exif_or_empty, read_image_header};
use base64::Engine;
use extract_ai_common::prompts::{IMAGE_SYSTEM_PROMPT, IMAGE_USER_PROMPT};
use extract_ai_common::{decode_visual_analysis, parse_model_json, ImageFindings};

const IMAGE_TEMPERATURE: f32 = 1.0;
const IMAGE_TOP_P: f32 = 1.0;
const IMAGE_MAX_COMPLETION_TOKENS: u32 = 4096;

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = mime.split(';').next().unwrap_or(mime).trim();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, encoded)
}

/// 画像の寸法・EXIF・AI解析をまとめて取得
///
/// 寸法が読めない画像はLLMを呼ぶ前に `ImageDecode` で失敗する。
pub async fn analyze_image(
    bytes: &[u8],
    mime: &str,
    provider: &dyn ChatProvider,
) -> Result<ImageFindings> {
    let header = read_image_header(bytes, mime)?;
    let exif = exif_or_empty(bytes);
    tracing::debug!(
        format = %header.format_tag,
        width = header.width,
        height = header.height,
        exif_tags = exif.len(),
        "image header read"
    );

    let request = ChatRequest::new(
        provider.model(),
        vec![
            ChatMessage::system(IMAGE_SYSTEM_PROMPT),
            ChatMessage::user_with_image(IMAGE_USER_PROMPT, to_data_url(mime, bytes)),
        ],
    )
    .temperature(IMAGE_TEMPERATURE)
    .top_p(IMAGE_TOP_P)
    .max_completion_tokens(IMAGE_MAX_COMPLETION_TOKENS);

    let raw = provider.complete_streamed(&request).await?;
    let reply = parse_model_json(&raw);
    if reply.as_object().is_some_and(|o| o.is_empty()) {
        tracing::warn!("image analysis reply was not usable JSON");
    }

    Ok(ImageFindings {
        format_tag: header.format_tag,
        width: header.width,
        height: header.height,
        exif,
        visual: decode_visual_analysis(&reply),
    })
}
