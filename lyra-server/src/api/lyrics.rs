//! Lyrics lookup endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::clients::genius::is_lyrics_page;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;
use crate::AppState;

/// Query parameters for lyrics lookup
#[derive(Debug, Default, Deserialize)]
pub struct LyricsQuery {
    /// Lyrics page URL; the session's resolved match is used when absent
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    /// Extracted text or "Cannot Find Lyrics"
    pub lyrics: String,
}

/// GET /api/lyrics
///
/// Only pages on the lyrics host are fetched; any other URL is a 400.
pub async fn get_lyrics(
    State(state): State<AppState>,
    Query(query): Query<LyricsQuery>,
    session: SessionContext,
) -> ApiResult<Json<LyricsResponse>> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .or(session.match_url);

    if let Some(url) = url.as_deref() {
        if !is_lyrics_page(url) {
            return Err(ApiError::BadRequest(format!(
                "not a lyrics page URL: {}",
                url
            )));
        }
    }

    let lyrics = state.pipeline.lookup_lyrics(url.as_deref()).await;
    Ok(Json(LyricsResponse { lyrics }))
}
