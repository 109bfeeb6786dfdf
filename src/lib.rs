//! Extract AI
//!
//! アップロードされた画像・テキスト・JSON・CSV・XMLを解析し、
//! 共通形式のJSONレポートとCSVプレビューを返すサーバーとCLI。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod scanner;
pub mod server;

pub use extract_ai_common as common;
