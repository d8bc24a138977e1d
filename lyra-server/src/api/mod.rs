//! HTTP API handlers for lyra-server

pub mod analysis;
pub mod health;
pub mod lyrics;
pub mod track;

pub use analysis::{analyze_lines, summarize};
pub use health::health_routes;
pub use lyrics::get_lyrics;
pub use track::current_track;
