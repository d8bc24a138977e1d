//! Streamed analysis endpoints
//!
//! Both respond with chunked `text/plain`; the concatenated body is the full
//! analysis or an embedded error marker.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::{BoxStream, StreamExt};
use lyra_common::AnalysisChunk;
use serde::Deserialize;
use std::convert::Infallible;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;
use crate::AppState;

/// Request body for analysis and summary
#[derive(Debug, Default, Deserialize)]
pub struct LyricsBody {
    #[serde(default)]
    pub lyrics: String,
}

fn lyrics_of(body: Result<Json<LyricsBody>, JsonRejection>) -> ApiResult<String> {
    body.map(|Json(body)| body.lyrics)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn text_stream(chunks: BoxStream<'static, AnalysisChunk>) -> Response {
    let body = Body::from_stream(chunks.map(|chunk| Ok::<_, Infallible>(chunk.text)));
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// POST /api/analysis
///
/// Per-line analysis of highlighted lyrics.
pub async fn analyze_lines(
    State(state): State<AppState>,
    session: SessionContext,
    body: Result<Json<LyricsBody>, JsonRejection>,
) -> ApiResult<Response> {
    let lyrics = lyrics_of(body)?;
    Ok(text_stream(state.pipeline.analyze_lines(&session, &lyrics)))
}

/// POST /api/summary
///
/// Whole-song summary of the full lyrics.
pub async fn summarize(
    State(state): State<AppState>,
    session: SessionContext,
    body: Result<Json<LyricsBody>, JsonRejection>,
) -> ApiResult<Response> {
    let lyrics = lyrics_of(body)?;
    Ok(text_stream(state.pipeline.summarize(&session, &lyrics)))
}
