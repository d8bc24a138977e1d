//! lyra-server library
//!
//! Resolves the lyrics page of a user's current track and streams an
//! AI-generated analysis of those lyrics.

use axum::Router;
use lyra_common::config::ServiceConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod error;
pub mod pipeline;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use crate::clients::{ClientError, GeminiClient, GeniusClient, LyricsPageClient, SpotifyClient};
use crate::pipeline::{Collaborators, TrackResolutionPipeline};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Stateless per call; safe to share across concurrent requests
    pub pipeline: Arc<TrackResolutionPipeline>,
}

impl AppState {
    pub fn new(pipeline: TrackResolutionPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Build state with the real upstream clients
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ClientError> {
        let genius = GeniusClient::new(&config.genius_api_base, config.genius_token.clone())?;
        let gemini = GeminiClient::new(
            &config.gemini_api_base,
            &config.gemini_model,
            config.gemini_api_key.clone(),
        )?;

        let collaborators = Collaborators {
            playback: Arc::new(SpotifyClient::new(&config.spotify_api_base)?),
            search: Arc::new(genius),
            pages: Arc::new(LyricsPageClient::new()?),
            generation: Arc::new(gemini),
        };

        Ok(Self::new(TrackResolutionPipeline::new(collaborators)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/current", get(api::current_track))
        .route("/api/lyrics", get(api::get_lyrics))
        .route("/api/analysis", post(api::analyze_lines))
        .route("/api/summary", post(api::summarize))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
