//! Request-scoped data model shared by the resolution pipeline and its clients
//!
//! Nothing here is persisted. Every value is built for one HTTP exchange and
//! dropped when the response ends.

use serde::{Deserialize, Serialize};

/// Metadata of the track currently playing for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Raw track title as reported by the player (may carry remix/feature markup)
    pub title: String,
    /// Credited artists in credit order
    pub artists: Vec<String>,
    /// Best-quality album art, absent for local files
    pub image_url: Option<String>,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, artists: Vec<String>, image_url: Option<String>) -> Self {
        Self {
            title: title.into(),
            artists,
            image_url,
        }
    }

    /// Artists joined with `", "` for display and query construction
    pub fn artist_display(&self) -> String {
        self.artists.join(", ")
    }
}

/// One candidate returned by the lyrics search provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Full display title, e.g. "Blinding Lights by The Weeknd"
    pub display_title: String,
    /// Lyrics page URL
    pub url: String,
}

/// Outcome of match resolution
///
/// `url` is absent when no candidate cleared the similarity floor of any tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub url: Option<String>,
}

impl MatchResult {
    pub fn found(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.url.is_some()
    }
}

/// One piece of a streamed lyric analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisChunk {
    pub text: String,
    /// Generation was halted by content policy; no chunk follows a blocked one
    pub blocked: bool,
}

impl AnalysisChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocked: false,
        }
    }

    pub fn blocked(marker: impl Into<String>) -> Self {
        Self {
            text: marker.into(),
            blocked: true,
        }
    }
}
