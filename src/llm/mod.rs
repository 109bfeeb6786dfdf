//! LLMクライアント
//!
//! OpenAI互換のchat completions APIを `ChatProvider` トレイトの裏に隠す。
//! - `complete`: 1回で応答全体を受け取る
//! - `complete_streamed`: ストリームを最後まで読み切り、断片を連結して返す

mod groq;
mod stream;

pub use groq::GroqClient;
pub use stream::StreamAccumulator;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// テキスト + 画像（data URL）のマルチモーダルメッセージ
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// chat completionsのリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            top_p: None,
            max_tokens: None,
            max_completion_tokens: None,
            stream: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn max_completion_tokens(mut self, max_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_tokens);
        self
    }
}

/// LLMプロバイダの抽象（テストではインメモリ実装に差し替える）
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// リクエストに載せるモデルID
    fn model(&self) -> &str;

    /// 単発呼び出し。応答本文（`choices[0].message.content`）を返す
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// ストリーミング呼び出し。終端まで待ってから全断片を連結して返す
    async fn complete_streamed(&self, request: &ChatRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multimodal_message_shape() {
        let message = ChatMessage::user_with_image("Analyze this image.", "data:image/png;base64,AAAA");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "Analyze this image."},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            })
        );
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let request = ChatRequest::new("m", vec![ChatMessage::user("hi")]).temperature(0.5);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_streamed_request_flag() {
        let mut request = ChatRequest::new("m", vec![ChatMessage::system("s")])
            .top_p(1.0)
            .max_completion_tokens(4096);
        request.stream = true;
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], json!(true));
        assert_eq!(value["max_completion_tokens"], json!(4096));
        assert!(value.get("max_tokens").is_none());
    }

    /// 送信するのはsystemとuserだけ
    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::System).unwrap(), json!("system"));
        assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
        assert!(serde_json::from_value::<Role>(json!("assistant")).is_err());
    }
}
