//! Track-to-lyrics resolution and streamed analysis pipeline
//!
//! playback metadata → [`normalizer`] → [`resolver`] (two-tier search) → match URL
//!
//! Later, independent calls take the match URL through [`extractor`] and the
//! resulting lyric text through [`streamer`].

pub mod extractor;
pub mod normalizer;
pub mod prompts;
pub mod resolver;
pub mod streamer;

pub use resolver::MatchResolver;
pub use streamer::AnalysisStreamer;

use crate::clients::{GenerationProvider, PageFetcher, PlaybackProvider, SearchProvider};
use crate::session::SessionContext;
use futures::stream::BoxStream;
use lyra_common::{AnalysisChunk, MatchResult, TrackMetadata};
use std::sync::Arc;
use tracing::{info, warn};

/// Lyrics lookup result when nothing could be extracted
pub const LYRICS_NOT_FOUND: &str = "Cannot Find Lyrics";

/// Summary reply when there are no lyrics to summarize
pub const NO_LYRICS_MESSAGE: &str = "Without the lyrics I am unable to analyze the current song.";

/// Analysis reply when the session carries no track
pub const NO_SESSION_MESSAGE: &str = "Please start a Spotify session.";

/// Current track with its normalized title and resolved lyrics page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub metadata: TrackMetadata,
    pub normalized_title: String,
    pub matched: MatchResult,
}

/// Collaborators the pipeline is built from
#[derive(Clone)]
pub struct Collaborators {
    pub playback: Arc<dyn PlaybackProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub pages: Arc<dyn PageFetcher>,
    pub generation: Arc<dyn GenerationProvider>,
}

pub struct TrackResolutionPipeline {
    playback: Arc<dyn PlaybackProvider>,
    resolver: MatchResolver,
    pages: Arc<dyn PageFetcher>,
    streamer: AnalysisStreamer,
}

impl TrackResolutionPipeline {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            playback: collaborators.playback,
            resolver: MatchResolver::new(collaborators.search),
            pages: collaborators.pages,
            streamer: AnalysisStreamer::new(collaborators.generation),
        }
    }

    /// Fetch the caller's current track and resolve its lyrics page
    ///
    /// `None` when nothing is playing or playback could not be read.
    pub async fn resolve_current(&self, bearer: &str) -> Option<ResolvedTrack> {
        let metadata = match self.playback.current_track(bearer).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                info!("No active playback");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to get current playback");
                return None;
            }
        };

        Some(self.resolve_track(metadata).await)
    }

    /// Normalize a track's title and resolve its lyrics page
    pub async fn resolve_track(&self, metadata: TrackMetadata) -> ResolvedTrack {
        let normalized_title = normalizer::normalize(&metadata.title);
        let artists = metadata.artist_display();

        info!(title = %normalized_title, artists = %artists, "Resolving lyrics page");
        let matched = self.resolver.resolve(&normalized_title, &artists).await;

        ResolvedTrack {
            metadata,
            normalized_title,
            matched,
        }
    }

    /// Lyric text of a resolved page, or [`LYRICS_NOT_FOUND`]
    pub async fn lookup_lyrics(&self, url: Option<&str>) -> String {
        let Some(url) = url else {
            info!("No lyrics page resolved for this session");
            return LYRICS_NOT_FOUND.to_string();
        };

        let html = match self.pages.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch lyrics page");
                return LYRICS_NOT_FOUND.to_string();
            }
        };

        let lyrics = extractor::extract(&html);
        if lyrics.is_empty() {
            warn!(url = %url, "No lyric containers on page");
            return LYRICS_NOT_FOUND.to_string();
        }

        info!(url = %url, chars = lyrics.len(), "Extracted lyrics");
        lyrics
    }

    /// Stream a per-line annotation of a highlighted excerpt
    pub fn analyze_lines(
        &self,
        session: &SessionContext,
        lyrics: &str,
    ) -> BoxStream<'static, AnalysisChunk> {
        match &session.track {
            Some(track) => self
                .streamer
                .stream(prompts::line_analysis(&track.title, &track.artists, lyrics)),
            None => AnalysisStreamer::fixed(NO_SESSION_MESSAGE),
        }
    }

    /// Stream a whole-song summary
    ///
    /// Missing lyrics short-circuit before any generation call.
    pub fn summarize(
        &self,
        session: &SessionContext,
        lyrics: &str,
    ) -> BoxStream<'static, AnalysisChunk> {
        if lyrics == LYRICS_NOT_FOUND || lyrics.is_empty() {
            return AnalysisStreamer::fixed(NO_LYRICS_MESSAGE);
        }

        match &session.track {
            Some(track) => self
                .streamer
                .stream(prompts::song_summary(&track.title, &track.artists, lyrics)),
            None => AnalysisStreamer::fixed(NO_SESSION_MESSAGE),
        }
    }
}
