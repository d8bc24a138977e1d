//! Fake upstream collaborators for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use lyra_common::{SearchHit, TrackMetadata};
use lyra_server::clients::{
    ClientError, GenerationChunk, GenerationProvider, PageFetcher, PlaybackProvider, SearchBatch,
    SearchProvider,
};
use lyra_server::pipeline::{Collaborators, TrackResolutionPipeline};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Playback fake with a fixed answer
pub struct FakePlayback {
    pub track: Option<TrackMetadata>,
    pub fail: bool,
    pub bearers: Mutex<Vec<String>>,
}

impl FakePlayback {
    pub fn playing(track: TrackMetadata) -> Self {
        Self {
            track: Some(track),
            fail: false,
            bearers: Mutex::new(Vec::new()),
        }
    }

    pub fn idle() -> Self {
        Self {
            track: None,
            fail: false,
            bearers: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::idle()
        }
    }
}

#[async_trait]
impl PlaybackProvider for FakePlayback {
    async fn current_track(&self, bearer: &str) -> Result<Option<TrackMetadata>, ClientError> {
        self.bearers.lock().unwrap().push(bearer.to_string());
        if self.fail {
            return Err(ClientError::Api(401, "The access token expired".to_string()));
        }
        Ok(self.track.clone())
    }
}

/// Search fake answering by exact query text; unknown queries return no hits
#[derive(Default)]
pub struct FakeSearch {
    pub answers: HashMap<String, Vec<(String, String)>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn with(mut self, query: &str, hits: &[(&str, &str)]) -> Self {
        self.answers.insert(
            query.to_string(),
            hits.iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
        );
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str) -> Result<SearchBatch, ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .answers
            .get(query)
            .map(|hits| {
                hits.iter()
                    .map(|(title, url)| {
                        Ok(SearchHit {
                            display_title: title.clone(),
                            url: url.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Page fake serving fixed HTML per URL; unknown URLs are 404
#[derive(Default)]
pub struct FakePages {
    pub pages: HashMap<String, String>,
}

impl FakePages {
    pub fn with(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for FakePages {
    async fn fetch_html(&self, url: &str) -> Result<String, ClientError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ClientError::Api(404, format!("GET {}", url)))
    }
}

/// Generation fake streaming the same text chunks on every call
#[derive(Default)]
pub struct FakeGeneration {
    pub chunks: Vec<GenerationChunk>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGeneration {
    pub fn replying(texts: &[&str]) -> Self {
        Self {
            chunks: texts
                .iter()
                .map(|t| GenerationChunk::from_text(*t, None))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for FakeGeneration {
    async fn generate_stream(
        &self,
        prompt: &str,
    ) -> Result<BoxStream<'static, Result<GenerationChunk, ClientError>>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(stream::iter(self.chunks.clone().into_iter().map(Ok)).boxed())
    }
}

/// Handles to the fakes behind a pipeline
pub struct Fakes {
    pub playback: Arc<FakePlayback>,
    pub search: Arc<FakeSearch>,
    pub pages: Arc<FakePages>,
    pub generation: Arc<FakeGeneration>,
}

impl Fakes {
    pub fn new(
        playback: FakePlayback,
        search: FakeSearch,
        pages: FakePages,
        generation: FakeGeneration,
    ) -> Self {
        Self {
            playback: Arc::new(playback),
            search: Arc::new(search),
            pages: Arc::new(pages),
            generation: Arc::new(generation),
        }
    }

    pub fn pipeline(&self) -> TrackResolutionPipeline {
        TrackResolutionPipeline::new(Collaborators {
            playback: self.playback.clone(),
            search: self.search.clone(),
            pages: self.pages.clone(),
            generation: self.generation.clone(),
        })
    }
}

pub fn weeknd_track() -> TrackMetadata {
    TrackMetadata::new(
        "Blinding Lights (Official Video)",
        vec!["The Weeknd".to_string()],
        Some("https://i.scdn.co/image/blinding.jpg".to_string()),
    )
}

pub const BLINDING_LIGHTS_URL: &str = "https://genius.com/The-weeknd-blinding-lights-lyrics";

pub const BLINDING_LIGHTS_HTML: &str = r#"<html><body>
<div data-lyrics-container="true">[Verse 1]<br>I've been tryna call<br>I've been on my own for long enough</div>
<div class="RightSidebar">Advertisement</div>
<div data-lyrics-container="true">[Chorus]<br>I said, ooh, I'm blinded by the lights</div>
</body></html>"#;
