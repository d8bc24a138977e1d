//! Upstream collaborators
//!
//! Each external capability sits behind a trait so the pipeline can be driven
//! by fakes in tests. The concrete clients talk to Spotify (playback), Genius
//! (search and lyric pages) and Gemini (streamed generation).

use async_trait::async_trait;
use futures::stream::BoxStream;
use lyra_common::{SearchHit, TrackMetadata};
use serde::Deserialize;
use thiserror::Error;

pub mod gemini;
pub mod genius;
pub mod spotify;

pub use gemini::GeminiClient;
pub use genius::{GeniusClient, LyricsPageClient};
pub use spotify::SpotifyClient;

/// Upstream client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// Generation response carries no usable text
    #[error("Generation stopped: {0}")]
    Generation(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// Hits of one search call. The outer `Result` fails the whole call; each
/// inner `Result` is one candidate that may be malformed on its own.
pub type SearchBatch = Vec<Result<SearchHit, ClientError>>;

/// Current-playback capability
#[async_trait]
pub trait PlaybackProvider: Send + Sync {
    /// Track playing for the bearer credential, `None` when nothing is playing
    async fn current_track(&self, bearer: &str) -> Result<Option<TrackMetadata>, ClientError>;
}

/// Lyrics search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchBatch, ClientError>;
}

/// Raw lyric page download
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, ClientError>;
}

/// Streamed text generation capability
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Start one generation. Chunks arrive in emission order; an `Err` item
    /// ends the useful part of the stream.
    async fn generate_stream(
        &self,
        prompt: &str,
    ) -> Result<BoxStream<'static, Result<GenerationChunk, ClientError>>, ClientError>;
}

/// One streamed generation response chunk (Gemini `GenerateContentResponse`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Moderation classification that halts analysis with the blocked marker.
pub const POLICY_BLOCK_REASON: &str = "OTHER";

/// Finish reasons whose candidate text must not be used
const FAILED_FINISH_REASONS: [&str; 2] = ["SAFETY", "RECITATION"];

impl GenerationChunk {
    /// Text chunk with a given finish reason, mainly for tests and fakes
    pub fn from_text(text: impl Into<String>, finish_reason: Option<&str>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: finish_reason.map(str::to_string),
            }],
            prompt_feedback: None,
        }
    }

    /// Concatenated text parts of the first candidate
    ///
    /// Fails when there is no candidate (including prompt-feedback-only
    /// responses) or the candidate finished with `SAFETY` or `RECITATION`.
    pub fn text(&self) -> Result<String, ClientError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref());
            return Err(ClientError::Generation(match reason {
                Some(reason) => format!("prompt blocked ({})", reason),
                None => "response has no candidates".to_string(),
            }));
        };

        if let Some(reason) = candidate
            .finish_reason
            .as_deref()
            .filter(|r| FAILED_FINISH_REASONS.contains(r))
        {
            return Err(ClientError::Generation(format!(
                "candidate finished with {}",
                reason
            )));
        }

        Ok(candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default())
    }

    /// Either the prompt-level block reason or the first candidate's finish
    /// reason carries the policy-block classification
    pub fn is_policy_block(&self) -> bool {
        let prompt_blocked = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            == Some(POLICY_BLOCK_REASON);
        let candidate_blocked = self
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            == Some(POLICY_BLOCK_REASON);
        prompt_blocked || candidate_blocked
    }
}
