//! Search provider seam.
//!
//! The metadata/search lookup is an external collaborator; the pipeline
//! needs only "results for a query". Hits are plain structs with zero
//! transport dependency, so hosts plug in whatever index they have.

use async_trait::async_trait;

/// A single search result: enough to render a preview and key a job.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Canonical media URL; the source identifier across cache and jobs.
    pub url: String,
    /// Declared title, shown in the preview and in delivery filenames.
    pub title: String,
    /// Human-formatted duration, e.g. "3:42".
    pub duration_label: String,
    /// View count at search time.
    pub views: u64,
    /// Channel or uploader name.
    pub author: String,
    /// Thumbnail URL for transports that render preview images.
    pub thumbnail_url: Option<String>,
}

/// Trait implemented by the external metadata/search lookup.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Best-first results for a free-text query.
    ///
    /// An empty vector is a normal outcome, not an error; errors are for
    /// the lookup itself failing.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchHit>>;
}
