//! SSEストリームの逐次デコード
//!
//! バイト列の断片を受け取り、`data:` 行から `choices[0].delta.content` を取り出して連結する。
//! `data: [DONE]` で終端。行の途中で断片が切れていても次の断片と連結して処理する。

use crate::error::{ExtractAiError, Result};
use serde_json::Value;

/// 未処理行のバッファ上限
const MAX_SSE_BUFFER_SIZE: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct StreamAccumulator {
    pending: Vec<u8>,
    content: String,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 断片を投入する。終端（`[DONE]`）に達したら `true`
    pub fn feed(&mut self, chunk: &[u8]) -> Result<bool> {
        if self.done {
            return Ok(true);
        }

        self.pending.extend_from_slice(chunk);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if self.process_line(&line)? {
                self.done = true;
                self.pending.clear();
                return Ok(true);
            }
        }

        if self.pending.len() > MAX_SSE_BUFFER_SIZE {
            return Err(ExtractAiError::ApiStream(
                "SSE buffer exceeded maximum size".into(),
            ));
        }
        Ok(false)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// ここまでの連結結果（改行で終わらない最後の行も処理する）
    pub fn finish(mut self) -> Result<String> {
        if !self.done && !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.process_line(&line)?;
        }
        Ok(self.content)
    }

    fn process_line(&mut self, raw: &[u8]) -> Result<bool> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();

        // 空行・コメント・data以外のフィールドは読み飛ばす
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(false);
        };
        let data = data.trim_start();

        if data == "[DONE]" {
            return Ok(true);
        }

        let event: Value = serde_json::from_str(data).map_err(|e| {
            ExtractAiError::ApiStream(format!("invalid stream chunk: {}", e))
        })?;

        if let Some(error) = event.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            return Err(ExtractAiError::ApiStream(message));
        }

        if let Some(delta) = event
            .pointer("/choices/0/delta/content")
            .and_then(Value::as_str)
        {
            self.content.push_str(delta);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"index": 0, "delta": {"content": content}}]})
        )
    }

    #[test]
    fn test_concatenates_deltas_until_done() {
        let mut acc = StreamAccumulator::new();
        assert!(!acc.feed(chunk("{\"image_").as_bytes()).unwrap());
        assert!(!acc.feed(chunk("description\": \"cat\"}").as_bytes()).unwrap());
        assert!(acc.feed(b"data: [DONE]\n\n").unwrap());
        assert!(acc.is_done());
        assert_eq!(acc.finish().unwrap(), "{\"image_description\": \"cat\"}");
    }

    #[test]
    fn test_line_split_across_chunks() {
        let payload = chunk("hello");
        let (a, b) = payload.as_bytes().split_at(12);
        let mut acc = StreamAccumulator::new();
        acc.feed(a).unwrap();
        acc.feed(b).unwrap();
        assert_eq!(acc.finish().unwrap(), "hello");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let payload = chunk("日本語");
        let bytes = payload.as_bytes();
        let split = payload.find('本').unwrap() + 1;
        let mut acc = StreamAccumulator::new();
        acc.feed(&bytes[..split]).unwrap();
        acc.feed(&bytes[split..]).unwrap();
        assert_eq!(acc.finish().unwrap(), "日本語");
    }

    #[test]
    fn test_ignores_role_only_and_comment_lines() {
        let mut acc = StreamAccumulator::new();
        acc.feed(b": keep-alive\n").unwrap();
        acc.feed(b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n").unwrap();
        acc.feed(chunk("x").as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "x");
    }

    #[test]
    fn test_final_line_without_newline() {
        let mut acc = StreamAccumulator::new();
        acc.feed(chunk("a").trim_end().as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "a");
    }

    #[test]
    fn test_error_event() {
        let mut acc = StreamAccumulator::new();
        let result = acc.feed(b"data: {\"error\":{\"message\":\"rate limited\"}}\n");
        match result {
            Err(ExtractAiError::ApiStream(msg)) => assert_eq!(msg, "rate limited"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_chunk() {
        let mut acc = StreamAccumulator::new();
        assert!(matches!(
            acc.feed(b"data: {not json\n"),
            Err(ExtractAiError::ApiStream(_))
        ));
    }

    #[test]
    fn test_data_after_done_is_ignored() {
        let mut acc = StreamAccumulator::new();
        let mut payload = chunk("a");
        payload.push_str("data: [DONE]\n");
        payload.push_str(&chunk("b"));
        assert!(acc.feed(payload.as_bytes()).unwrap());
        assert!(acc.feed(chunk("c").as_bytes()).unwrap());
        assert_eq!(acc.finish().unwrap(), "a");
    }
}
