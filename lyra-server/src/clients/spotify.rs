//! Spotify Web API client (current playback)

use super::{ClientError, PlaybackProvider};
use async_trait::async_trait;
use lyra_common::TrackMetadata;
use serde::Deserialize;
use std::time::Duration;

/// `GET /me/player` response, only the fields used here
#[derive(Debug, Deserialize)]
struct PlayerState {
    item: Option<PlayerItem>,
}

#[derive(Debug, Deserialize)]
struct PlayerItem {
    name: String,
    #[serde(default)]
    artists: Vec<PlayerArtist>,
    album: Option<PlayerAlbum>,
}

#[derive(Debug, Deserialize)]
struct PlayerArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlayerAlbum {
    #[serde(default)]
    images: Vec<PlayerImage>,
}

#[derive(Debug, Deserialize)]
struct PlayerImage {
    url: String,
}

impl PlayerItem {
    fn into_metadata(self) -> TrackMetadata {
        // Spotify lists album images largest first
        let image_url = self
            .album
            .and_then(|a| a.images.into_iter().next())
            .map(|img| img.url);

        TrackMetadata::new(
            self.name,
            self.artists.into_iter().map(|a| a.name).collect(),
            image_url,
        )
    }
}

/// Spotify playback client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl SpotifyClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlaybackProvider for SpotifyClient {
    async fn current_track(&self, bearer: &str) -> Result<Option<TrackMetadata>, ClientError> {
        let url = format!("{}/me/player", self.api_base);

        tracing::debug!(url = %url, "Querying current playback");

        let response = self.http_client.get(&url).bearer_auth(bearer).send().await?;
        let status = response.status();

        // 204: no active device
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(status.as_u16(), error_text));
        }

        let state: PlayerState = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(state.item.map(PlayerItem::into_metadata))
    }
}
