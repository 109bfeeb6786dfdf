//! Groq（OpenAI互換）APIクライアント

use super::{ChatProvider, ChatRequest, StreamAccumulator};
use crate::config::Config;
use crate::error::{ExtractAiError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;

/// 応答本文がない場合の既定値（空オブジェクトとしてパースされる）
const EMPTY_REPLY: &str = "{}";

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl GroqClient {
    /// 設定からクライアントを作る（APIキー未設定なら `MissingApiKey`）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExtractAiError::Config(format!("HTTPクライアント作成失敗: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        tracing::debug!(
            model = %request.model,
            stream = request.stream,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ExtractAiError::ApiCall(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractAiError::ApiCall(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for GroqClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut request = request.clone();
        request.stream = false;

        let response = self.send(&request).await?;
        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ExtractAiError::ApiCall(format!("invalid response body: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        Ok(content)
    }

    async fn complete_streamed(&self, request: &ChatRequest) -> Result<String> {
        let mut request = request.clone();
        request.stream = true;

        let response = self.send(&request).await?;
        let mut stream = response.bytes_stream();
        let mut accumulator = StreamAccumulator::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ExtractAiError::ApiStream(e.to_string()))?;
            if accumulator.feed(&chunk)? {
                break;
            }
        }

        let content = accumulator.finish()?;
        tracing::debug!(chars = content.len(), "stream drained");
        Ok(content)
    }
}
