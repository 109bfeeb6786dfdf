//! 環境変数からの設定読み込み
//!
//! 起動時に一度だけ読み、以後はリクエスト間で共有する（読み取り専用）。

use crate::error::{ExtractAiError, Result};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    /// LLM呼び出しのタイムアウト（未設定ならクライアント既定）
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.into()],
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            request_timeout: None,
        }
    }
}

impl Config {
    /// プロセスの環境変数から読み込む（`.env` は呼び出し側で読み込み済みの前提）
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GROQ_API_KEY").or_else(|| get("VITE_GROQ_API_KEY"));

        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => vec![DEFAULT_CORS_ORIGIN.to_string()],
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ExtractAiError::Config(format!("PORTが不正です: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    ExtractAiError::Config(format!("LLM_TIMEOUT_SECSが不正です: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            model: get("GROQ_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: get("GROQ_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            cors_origins,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            request_timeout,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// LLMを使う処理の前に呼ぶ（未設定なら `MissingApiKey`）
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(ExtractAiError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.request_timeout, None);
        assert!(matches!(config.require_api_key(), Err(ExtractAiError::MissingApiKey)));
    }

    #[test]
    fn test_api_key_fallback() {
        let config = Config::from_lookup(lookup(&[("VITE_GROQ_API_KEY", "vite-key")])).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "vite-key");

        let config = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "main-key"),
            ("VITE_GROQ_API_KEY", "vite-key"),
        ]))
        .unwrap();
        assert_eq!(config.require_api_key().unwrap(), "main-key");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = Config::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_cors_origins_split() {
        let config = Config::from_lookup(lookup(&[(
            "CORS_ORIGINS",
            "https://a.example, https://b.example,,",
        )]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GROQ_MODEL_ID", "llama-3.1-8b-instant"),
            ("GROQ_BASE_URL", "http://localhost:8080/v1/"),
            ("PORT", "8081"),
            ("HOST", "127.0.0.1"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(ExtractAiError::Config(_))));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = Config::from_lookup(lookup(&[("GROQ_API_KEY", "secret")])).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
