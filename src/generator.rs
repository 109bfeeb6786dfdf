//! 表データ生成
//!
//! 行・列の見出しからLLMに2次元の文字列配列を作らせる。

use crate::error::{ExtractAiError, Result};
use crate::llm::{ChatMessage, ChatProvider, ChatRequest};
use extract_ai_common::decode_generated_table;
use extract_ai_common::prompts::build_generate_data_prompt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_CREATIVITY: f32 = 0.5;
const GENERATE_MAX_TOKENS: u32 = 2000;

/// リクエストボディ（型の検証は `validate` で行う）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDataRequest {
    #[serde(default)]
    pub horizontal_headers: Option<Value>,
    #[serde(default)]
    pub vertical_headers: Option<Value>,
    #[serde(default)]
    pub data_types: Option<Value>,
    #[serde(default)]
    pub creativity_level: Option<Value>,
}

/// 検証済みの生成パラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub horizontal_headers: Vec<Value>,
    pub vertical_headers: Vec<Value>,
    pub data_types: Option<Value>,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateDataResponse {
    pub success: bool,
    pub data: Vec<Vec<String>>,
}

impl GenerateDataRequest {
    /// 両方の見出しが配列であることを確認（それ以外は `InvalidHeaders`）
    pub fn validate(self) -> Result<TableSpec> {
        let (Some(Value::Array(horizontal)), Some(Value::Array(vertical))) =
            (self.horizontal_headers, self.vertical_headers)
        else {
            return Err(ExtractAiError::InvalidHeaders);
        };

        // 数値以外の創造性レベルは既定値
        let temperature = self
            .creativity_level
            .as_ref()
            .and_then(Value::as_f64)
            .map(|level| level as f32)
            .unwrap_or(DEFAULT_CREATIVITY);

        Ok(TableSpec {
            horizontal_headers: horizontal,
            vertical_headers: vertical,
            data_types: self.data_types,
            temperature,
        })
    }
}

impl TableSpec {
    pub fn to_request(&self, model: &str) -> ChatRequest {
        let prompt = build_generate_data_prompt(
            &self.horizontal_headers,
            &self.vertical_headers,
            self.data_types.as_ref(),
        );
        ChatRequest::new(model, vec![ChatMessage::user(prompt)])
            .temperature(self.temperature)
            .max_tokens(GENERATE_MAX_TOKENS)
    }
}

/// 生成を実行（応答が読めなければ空の表）
pub async fn generate_table(
    spec: &TableSpec,
    provider: &dyn ChatProvider,
) -> Result<GenerateDataResponse> {
    tracing::info!(
        columns = spec.horizontal_headers.len(),
        rows = spec.vertical_headers.len(),
        "generating table data"
    );

    let raw = provider.complete(&spec.to_request(provider.model())).await?;
    let data = decode_generated_table(&raw);
    if data.is_empty() {
        tracing::warn!("generated table reply was empty or unparsable");
    }

    Ok(GenerateDataResponse {
        success: true,
        data,
    })
}
