//! Streamed lyric analysis with moderation early-stop

use crate::clients::GenerationProvider;
use futures::stream::{self, BoxStream, StreamExt};
use lyra_common::AnalysisChunk;
use std::sync::Arc;
use tracing::{info, warn};

/// Emitted once when generation is halted by content policy
pub const BLOCKED_MARKER: &str = "\n### ERROR, cannot analyze specific slurs.";

/// Emitted once when the generation call fails at any point
pub const ERROR_MARKER: &str = "\n### ERROR";

/// Drives one streamed generation per call
#[derive(Clone)]
pub struct AnalysisStreamer {
    provider: Arc<dyn GenerationProvider>,
}

impl AnalysisStreamer {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Start a generation for `prompt` and expose it as a lazy chunk stream
    ///
    /// Chunks keep upstream order. A policy block ends the stream with one
    /// blocked chunk and leaves the rest of the upstream unread. A transport
    /// failure or a chunk without usable text ends it with one error chunk.
    /// Dropping the stream drops the upstream.
    pub fn stream(&self, prompt: String) -> BoxStream<'static, AnalysisChunk> {
        let provider = Arc::clone(&self.provider);

        let chunks = async_stream::stream! {
            let mut source = match provider.generate_stream(&prompt).await {
                Ok(source) => source,
                Err(e) => {
                    warn!(error = %e, "Analysis generation failed to start");
                    yield AnalysisChunk::text(ERROR_MARKER);
                    return;
                }
            };

            let mut forwarded = 0usize;
            while let Some(item) = source.next().await {
                let text = match item {
                    Ok(chunk) if chunk.is_policy_block() => {
                        info!(forwarded, "Analysis halted by content policy");
                        yield AnalysisChunk::blocked(BLOCKED_MARKER);
                        return;
                    }
                    Ok(chunk) => chunk.text(),
                    Err(e) => Err(e),
                };

                match text {
                    Ok(text) => {
                        forwarded += 1;
                        yield AnalysisChunk::text(text);
                    }
                    Err(e) => {
                        warn!(forwarded, error = %e, "Analysis generation failed mid-stream");
                        yield AnalysisChunk::text(ERROR_MARKER);
                        return;
                    }
                }
            }

            info!(forwarded, "Analysis generation complete");
        };

        chunks.boxed()
    }

    /// Single fixed chunk, no generation
    pub fn fixed(text: &str) -> BoxStream<'static, AnalysisChunk> {
        stream::iter([AnalysisChunk::text(text)]).boxed()
    }
}
