//! Gemini streaming generation client
//!
//! Uses `streamGenerateContent?alt=sse`; every SSE `data:` event carries one
//! `GenerateContentResponse` JSON object.

use super::{ClientError, GenerationChunk, GenerationProvider};
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream};
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;

/// Harm categories whose filters are switched off for lyric analysis
const RELAXED_HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            safety_settings: RELAXED_HARM_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }
}

/// Incremental `text/event-stream` decoder yielding joined `data:` payloads
#[derive(Debug, Default)]
struct SseDecoder {
    pending: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Feed raw bytes, returning every event completed by them
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            if let Some(event) = self.handle_line(line.trim_end_matches(&['\n', '\r'][..])) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is left once the body ends
    fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&raw);
            if let Some(event) = self.handle_line(line.trim_end_matches(&['\n', '\r'][..])) {
                return Some(event);
            }
        }
        self.take_event()
    }

    fn handle_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.take_event();
        }
        if let Some(rest) = line.strip_prefix("data:") {
            self.data_lines
                .push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        }
        // comments, `event:`, `id:` and `retry:` fields are irrelevant here
        None
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(data)
    }
}

fn parse_chunk(payload: &str) -> Result<GenerationChunk, ClientError> {
    serde_json::from_str(payload).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Turn a raw SSE response body into generation chunks
fn decode_event_stream<S, B, E>(
    body: S,
) -> impl Stream<Item = Result<GenerationChunk, ClientError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Send + 'static,
    ClientError: From<E>,
{
    async_stream::try_stream! {
        let mut body = Box::pin(body);
        let mut decoder = SseDecoder::default();
        while let Some(piece) = body.next().await {
            let piece = piece?;
            for payload in decoder.feed(piece.as_ref()) {
                yield parse_chunk(&payload)?;
            }
        }
        if let Some(payload) = decoder.finish() {
            yield parse_chunk(&payload)?;
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ClientError> {
        // No overall timeout: a long generation legitimately streams for a while
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate_stream(
        &self,
        prompt: &str,
    ) -> Result<BoxStream<'static, Result<GenerationChunk, ClientError>>, ClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientError::NotConfigured("gemini_api_key"))?;

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Starting Gemini generation");

        let response = self
            .http_client
            .post(self.stream_url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(status.as_u16(), error_text));
        }

        Ok(Box::pin(decode_event_stream(response.bytes_stream())))
    }
}
