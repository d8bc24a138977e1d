//! Lyrics page match resolution
//!
//! Two-tier search against the lyrics provider:
//! - Tier 1 queries title + artists and accepts a hit scoring above 0.70
//! - Tier 2 (only when tier 1 has no winner) queries the title alone and
//!   accepts a hit scoring above 0.40
//!
//! Artist mismatches (features, collaborations, credit order) depress scores
//! even for the right track, which is what the laxer title-only retry recovers.

use crate::clients::{SearchBatch, SearchProvider};
use lyra_common::{MatchResult, SearchHit};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Match floor for the title + artists search
pub const TIER1_FLOOR: f64 = 0.70;

/// Match floor for the title-only retry
pub const TIER2_FLOOR: f64 = 0.40;

/// Case-insensitive Sørensen-Dice similarity over character bigrams
///
/// Whitespace is ignored; identical strings score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// Arg-max over scored candidates, keeping only scores strictly above `floor`
///
/// Ties keep the earlier candidate.
pub fn best_above_floor<I>(scored: I, floor: f64) -> Option<(f64, String)>
where
    I: IntoIterator<Item = (f64, String)>,
{
    scored
        .into_iter()
        .fold(None, |best: Option<(f64, String)>, (score, url)| {
            let bar = best.as_ref().map_or(floor, |(s, _)| *s);
            if score > bar {
                Some((score, url))
            } else {
                best
            }
        })
}

/// Score every well-formed hit of a batch against the comparison string
fn score_batch(batch: SearchBatch, target: &str) -> Vec<(f64, String)> {
    batch
        .into_iter()
        .filter_map(|hit| match hit {
            Ok(SearchHit { display_title, url }) => {
                let score = similarity(target, &display_title);
                debug!(score, title = %display_title, "Scored search hit");
                Some((score, url))
            }
            Err(e) => {
                debug!(error = %e, "Skipping malformed search hit");
                None
            }
        })
        .collect()
}

/// Selects the best lyrics page for a normalized title
pub struct MatchResolver {
    search: Arc<dyn SearchProvider>,
}

impl MatchResolver {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    /// Resolve a lyrics page URL for `normalized_title` by `artists`
    ///
    /// `artists` is the `", "`-joined display string. Never fails: upstream
    /// errors make a tier produce no winner.
    pub async fn resolve(&self, normalized_title: &str, artists: &str) -> MatchResult {
        let target = format!("{} by {}", normalized_title, artists);

        let tier1_query = format!("{} {}", normalized_title, artists);
        if let Some((score, url)) = self.run_tier(&tier1_query, &target, TIER1_FLOOR).await {
            info!(score, url = %url, "Matched lyrics page on title + artist search");
            return MatchResult::found(url);
        }

        if let Some((score, url)) = self.run_tier(normalized_title, &target, TIER2_FLOOR).await {
            info!(score, url = %url, "Matched lyrics page on title-only search");
            return MatchResult::found(url);
        }

        info!(comparison = %target, "No lyrics page cleared the match floor");
        MatchResult::none()
    }

    async fn run_tier(&self, query: &str, target: &str, floor: f64) -> Option<(f64, String)> {
        match self.search.search(query).await {
            Ok(batch) => best_above_floor(score_batch(batch, target), floor),
            Err(e) => {
                warn!(query = %query, error = %e, "Lyrics search failed");
                None
            }
        }
    }
}
