//! # Lyra Common Library
//!
//! Shared code for the Lyra service:
//! - Error types
//! - Configuration loading (CLI / ENV / TOML / defaults)
//! - Request-scoped data model (track metadata, search hits, analysis chunks)

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{AnalysisChunk, MatchResult, SearchHit, TrackMetadata};
