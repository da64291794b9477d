//! Tocadora - interactive media fetch pipeline for chat bots
//!
//! This library implements the full flow behind a "play" style command:
//! search preview, reaction/reply driven format choice, provider URL
//! resolution, bounded-concurrency download with validation and audio
//! transcoding, deduplicated jobs and a persisted artifact cache.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, and artifact validation
//! - `storage`: the persisted artifact cache
//! - `download`: resolver, download engine, transcode, job dedup, search seam
//! - `chat`: transport seam, interaction broker, preview and delivery
//! - `pipeline`: the orchestrating `MediaPipeline`

pub mod chat;
pub mod cli;
pub mod core;
pub mod download;
pub mod pipeline;
pub mod storage;

// Re-export commonly used types for convenience
pub use core::{config, FetchError, FetchResult};
pub use chat::{ChatEvent, ChatTransport, PlayCommand};
pub use download::{DownloadEngine, MediaFormat, MediaResolver, SearchProvider};
pub use pipeline::{MediaPipeline, PipelineConfig};
pub use storage::ArtifactCache;
