//! Current-track resolution
//!
//! Reads the caller's playback, resolves the lyrics page and writes the
//! session cookies later requests carry back.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::pipeline::ResolvedTrack;
use crate::session::{
    clear_cookie, set_cookie, SessionContext, COOKIE_ARTISTS, COOKIE_IMAGE, COOKIE_TITLE,
    COOKIE_URL,
};
use crate::AppState;

/// Current track as exposed to the front end
#[derive(Debug, Serialize)]
pub struct CurrentTrackResponse {
    pub title: String,
    pub artists: String,
    pub image: Option<String>,
    /// Resolved lyrics page, absent when no candidate cleared the match floor
    pub url: Option<String>,
}

impl From<&ResolvedTrack> for CurrentTrackResponse {
    fn from(resolved: &ResolvedTrack) -> Self {
        Self {
            title: resolved.metadata.title.clone(),
            artists: resolved.metadata.artist_display(),
            image: resolved.metadata.image_url.clone(),
            url: resolved.matched.url.clone(),
        }
    }
}

fn session_cookies(track: &CurrentTrackResponse) -> ApiResult<HeaderMap> {
    let values = [
        (COOKIE_TITLE, Some(track.title.as_str())),
        (COOKIE_ARTISTS, Some(track.artists.as_str())),
        (COOKIE_IMAGE, track.image.as_deref()),
        (COOKIE_URL, track.url.as_deref()),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in values {
        let cookie = match value {
            Some(v) => set_cookie(name, v),
            None => clear_cookie(name),
        };
        let header = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("invalid {} cookie: {}", name, e)))?;
        headers.append(SET_COOKIE, header);
    }
    Ok(headers)
}

/// GET /api/current
///
/// 401 without a playback credential, 204 when nothing is playing.
pub async fn current_track(
    State(state): State<AppState>,
    session: SessionContext,
) -> ApiResult<Response> {
    let bearer = session
        .bearer
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("no playback access token in session".to_string()))?;

    let Some(resolved) = state.pipeline.resolve_current(bearer).await else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let body = CurrentTrackResponse::from(&resolved);
    let cookies = session_cookies(&body)?;

    Ok((cookies, Json(body)).into_response())
}
