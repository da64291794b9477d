//! Download engine
//!
//! Bounded-concurrency transfer of resolved URLs into verified local
//! artifacts. Slot acquisition is FIFO: a burst beyond the ceiling queues
//! and each released slot wakes the earliest waiter. Bodies stream straight
//! to disk under one overall timeout; audio goes through the transcoder,
//! then everything passes validation and the size cap before it counts as
//! an artifact. Every failure path removes what it wrote.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use url::Url;
use uuid::Uuid;

use crate::core::config;
use crate::core::error::{FetchError, FetchResult};
use crate::core::validation;
use crate::download::{remove_quietly, transcode, MediaFormat};

/// Bounded-concurrency downloader producing verified artifacts.
///
/// Cheap to clone; clones share the slot pool and the in-flight gauge.
#[derive(Clone)]
pub struct DownloadEngine {
    client: reqwest::Client,
    slots: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    download_dir: Arc<PathBuf>,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DownloadEngine {
    /// Engine with the default ceiling, writing into `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Self::with_ceiling(download_dir, config::engine::MAX_CONCURRENT_DOWNLOADS)
    }

    /// Engine with an explicit concurrency ceiling; tests use small pools.
    pub fn with_ceiling(download_dir: impl Into<PathBuf>, max_concurrent: usize) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config::engine::download_timeout())
            .redirect(reqwest::redirect::Policy::limited(config::engine::MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            slots: Arc::new(Semaphore::new(max_concurrent)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            download_dir: Arc::new(download_dir.into()),
        })
    }

    /// Number of transfers holding a slot right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Fetches `url` into a verified artifact of `format`.
    ///
    /// Waits (FIFO) for a free slot, streams the body to a scratch file,
    /// transcodes audio to MP3, then validates size floor, container
    /// signature and size cap. The returned path lives in the engine's
    /// download directory.
    pub async fn fetch(&self, url: &Url, format: MediaFormat) -> FetchResult<PathBuf> {
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|e| FetchError::Transfer(format!("slot pool closed: {e}")))?;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _gauge = InFlightGuard(self.in_flight.clone());
        log::info!("⬇️ Downloading {} [{}] ({} active)", url, format, self.in_flight());

        tokio::fs::create_dir_all(self.download_dir.as_ref()).await?;

        let stem = Uuid::new_v4().to_string();
        let scratch = match format {
            // Audio containers vary until the transcoder has run.
            MediaFormat::Audio => self.download_dir.join(format!("{stem}.media")),
            MediaFormat::Video => self.download_dir.join(format!("{stem}.mp4")),
        };

        if let Err(e) = self.stream_to_file(url, &scratch).await {
            log::warn!("⬇️ Transfer failed for {}: {}", url, e);
            remove_quietly(&scratch).await;
            return Err(e);
        }

        let artifact = match format {
            MediaFormat::Audio => {
                transcode::to_mp3(&scratch, config::engine::AUDIO_BITRATE).await?
            }
            MediaFormat::Video => scratch,
        };

        if let Err(e) = validation::validate_artifact(&artifact, format) {
            log::warn!("⬇️ Discarding invalid download {}: {}", artifact.display(), e);
            remove_quietly(&artifact).await;
            return Err(e);
        }
        if let Err(e) = validation::enforce_size_limit(&artifact) {
            log::warn!("⬇️ Discarding oversized download {}: {}", artifact.display(), e);
            remove_quietly(&artifact).await;
            return Err(e);
        }

        log::info!("✅ Download complete: {}", artifact.display());
        Ok(artifact)
    }

    async fn stream_to_file(&self, url: &Url, dest: &Path) -> FetchResult<()> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        let cap = config::validation::max_file_bytes();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            if written > cap {
                // No point finishing a body that can never be delivered.
                return Err(FetchError::SizeLimit {
                    actual_mb: written.div_ceil(1024 * 1024),
                    limit_mb: config::validation::MAX_FILE_MB,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(())
    }
}
