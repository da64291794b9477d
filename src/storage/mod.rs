//! Persisted state

pub mod cache;

// Re-exports for convenience
pub use cache::ArtifactCache;
