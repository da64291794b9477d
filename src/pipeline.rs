//! Pipeline orchestration.
//!
//! `MediaPipeline` ties the pieces together: search, preview, pending-choice
//! brokering, resolution, deduplicated download and delivery. Every piece of
//! mutable state (cache, jobs, pending choices, the slot pool) is owned by
//! the pipeline instance; external collaborators come in as trait objects at
//! construction and the inbound event stream is subscribed exactly once via
//! [`MediaPipeline::run`].

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::chat::broker::{Choice, ClaimOutcome, InteractionBroker, PendingJob};
use crate::chat::transport::{ChatEvent, ChatId, ChatTransport, MessageId, PlayCommand};
use crate::chat::{delivery, preview};
use crate::core::config;
use crate::core::error::{FetchError, FetchResult};
use crate::core::validation;
use crate::download::engine::DownloadEngine;
use crate::download::jobs::JobRegistry;
use crate::download::resolver::MediaResolver;
use crate::download::search::SearchProvider;
use crate::download::MediaFormat;
use crate::storage::cache::ArtifactCache;

/// Tunables snapshotted at pipeline construction.
///
/// Defaults read the environment-backed config once; tests swap in temp
/// directories and a short interaction window.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub download_dir: PathBuf,
    pub cache_file: PathBuf,
    pub max_concurrent_downloads: usize,
    pub pending_window: chrono::Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(&*config::DOWNLOAD_DIR),
            cache_file: PathBuf::from(&*config::CACHE_FILE),
            max_concurrent_downloads: config::engine::MAX_CONCURRENT_DOWNLOADS,
            pending_window: config::interaction::pending_window(),
        }
    }
}

/// The interactive media fetch pipeline.
pub struct MediaPipeline {
    transport: Arc<dyn ChatTransport>,
    search: Arc<dyn SearchProvider>,
    resolver: Arc<dyn MediaResolver>,
    engine: DownloadEngine,
    jobs: JobRegistry,
    cache: ArtifactCache,
    broker: InteractionBroker,
}

impl MediaPipeline {
    /// Builds a pipeline instance, loading the artifact cache from disk.
    pub fn new(
        config: PipelineConfig,
        transport: Arc<dyn ChatTransport>,
        search: Arc<dyn SearchProvider>,
        resolver: Arc<dyn MediaResolver>,
    ) -> anyhow::Result<Self> {
        let engine =
            DownloadEngine::with_ceiling(&config.download_dir, config.max_concurrent_downloads)?;
        let cache = ArtifactCache::load(&config.cache_file);

        Ok(Self {
            transport,
            search,
            resolver,
            engine,
            jobs: JobRegistry::new(),
            cache,
            broker: InteractionBroker::new(config.pending_window),
        })
    }

    /// Handles one media request command: search, preview, register.
    ///
    /// An empty query gets the usage line. A query with no results gets the
    /// failure message and surfaces [`FetchError::NoSearchResult`]; search
    /// provider faults take the same path. On success the preview is
    /// registered with the broker and awaits the sender's choice.
    pub async fn handle_play(&self, command: PlayCommand) -> FetchResult<()> {
        let query = command.query.trim();
        if query.is_empty() {
            self.notify(&command.chat, preview::usage_text(), Some(&command.message_id)).await;
            return Ok(());
        }

        self.react_quietly(&command.chat, &command.message_id, "🕒").await;
        log::info!("🔎 Searching for {:?}", query);

        let hits = match self.search.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("🔎 Search provider failed for {:?}: {}", query, e);
                Vec::new()
            }
        };
        let hit = match hits.into_iter().next() {
            Some(hit) => hit,
            None => {
                let err = FetchError::NoSearchResult;
                self.notify(&command.chat, &err.user_message(), Some(&command.message_id)).await;
                return Err(err);
            }
        };

        log::info!("🔎 Top hit for {:?}: {} ({})", query, hit.title, hit.url);
        let caption = preview::build_caption(&hit);
        let preview_id = self
            .transport
            .send_preview(&command.chat, &caption, hit.thumbnail_url.as_deref(), &command.message_id)
            .await
            .map_err(|e| FetchError::Transfer(format!("preview send failed: {e}")))?;

        self.broker
            .register(
                preview_id,
                PendingJob {
                    chat: command.chat.clone(),
                    source_url: hit.url,
                    title: hit.title,
                    command_message: command.message_id.clone(),
                    owner: command.sender,
                },
            )
            .await;

        self.react_quietly(&command.chat, &command.message_id, "✅").await;
        Ok(())
    }

    /// Handles one inbound chat event.
    ///
    /// Events that are not a recognized choice, reference no pending
    /// preview, come from a non-owner or arrive after the window are all
    /// dropped without a reply. The first authorized choice claims the
    /// preview and runs the job to completion, messaging the outcome.
    pub async fn handle_event(&self, event: ChatEvent) {
        self.broker.sweep().await;

        let choice = match &event {
            ChatEvent::Reply { text, .. } => Choice::from_reply(text),
            ChatEvent::Reaction { emoji, .. } => Choice::from_reaction(emoji),
        };
        let choice = match choice {
            Some(choice) => choice,
            // Not part of the choice vocabulary; any pending entry stays.
            None => return,
        };

        let preview_id = event.target_message().clone();
        match self.broker.claim(&preview_id, event.sender()).await {
            ClaimOutcome::Granted(job) => self.fulfill(preview_id, job, choice).await,
            ClaimOutcome::Unknown | ClaimOutcome::Expired | ClaimOutcome::NotOwner => {}
        }
    }

    /// Consumes the inbound event stream; the single subscription point.
    ///
    /// Each event is handled on its own task so a running download never
    /// blocks the next claim. Returns when the sending side closes.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<ChatEvent>) {
        log::info!("🎧 Pipeline event loop started");
        while let Some(event) = events.recv().await {
            let pipeline = Arc::clone(&self);
            tokio::spawn(async move {
                pipeline.handle_event(event).await;
            });
        }
        log::info!("🎧 Pipeline event loop stopped");
    }

    /// Runs a granted claim to completion and reports the outcome.
    async fn fulfill(&self, preview_id: MessageId, job: PendingJob, choice: Choice) {
        log::info!(
            "🎬 Claim granted on {}: {} as {} (owner {})",
            preview_id,
            job.source_url,
            choice.describe(),
            job.owner
        );

        let progress = format!("⏳ Downloading {}...", choice.describe());
        self.notify(&job.chat, &progress, Some(&job.command_message)).await;
        self.react_quietly(&job.chat, &preview_id, "⏳").await;

        match self.produce_and_deliver(&job, choice).await {
            Ok(()) => {
                self.react_quietly(&job.chat, &preview_id, "✅").await;
            }
            Err(e) => {
                log::warn!("⚠️ Job for {} failed: {}", job.source_url, e);
                self.notify(&job.chat, &e.user_message(), Some(&job.command_message)).await;
                self.react_quietly(&job.chat, &preview_id, "❌").await;
            }
        }
    }

    async fn produce_and_deliver(&self, job: &PendingJob, choice: Choice) -> FetchResult<()> {
        let artifact = self.obtain_artifact(&job.source_url, choice.format).await?;
        delivery::deliver_artifact(
            self.transport.as_ref(),
            &job.chat,
            &artifact,
            &job.title,
            choice,
            Some(&job.command_message),
        )
        .await
    }

    /// Produces a verified artifact: cache hit, else resolve and fetch.
    ///
    /// A cache hit is re-validated before reuse; a stale one falls through
    /// to a fresh download. Fetches for the same (source, format) pair are
    /// deduplicated through the job registry, and fresh artifacts are
    /// recorded back into the cache.
    async fn obtain_artifact(&self, source_url: &str, format: MediaFormat) -> FetchResult<PathBuf> {
        if let Some(path) = self.cache.lookup(source_url, format).await {
            if validation::validate_for_delivery(&path, format).is_ok() {
                log::info!("🗃️ Reusing cached artifact for {} [{}]", source_url, format);
                return Ok(path);
            }
            log::debug!("🗃️ Cached artifact for {} [{}] is stale, refetching", source_url, format);
        }

        let resolved = self
            .resolver
            .resolve(source_url, format)
            .await
            .ok_or(FetchError::ResolveFailed)?;

        let engine = self.engine.clone();
        let url = resolved.clone();
        let artifact = self
            .jobs
            .get_or_start(source_url, format, move || async move {
                engine.fetch(&url, format).await
            })
            .await?;

        self.cache.record(source_url, format, &artifact).await;
        Ok(artifact)
    }

    /// Best-effort text send; transport faults are logged, never escalated.
    async fn notify(&self, chat: &ChatId, text: &str, quote: Option<&MessageId>) {
        if let Err(e) = self.transport.send_text(chat, text, quote).await {
            log::warn!("⚠️ Could not send message to {}: {}", chat, e);
        }
    }

    /// Best-effort reaction; reactions never fail a job.
    async fn react_quietly(&self, chat: &ChatId, target: &MessageId, emoji: &str) {
        if let Err(e) = self.transport.react(chat, target, emoji).await {
            log::warn!("⚠️ Could not react {} on {}: {}", emoji, target, e);
        }
    }

    /// Number of previews currently awaiting a choice.
    pub async fn pending_choices(&self) -> usize {
        self.broker.pending_count().await
    }
}
