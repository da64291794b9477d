//! Interaction broker.
//!
//! Correlates choice events (reactions or replies targeting a preview
//! message) with the job they belong to, enforcing ownership and the
//! interaction window. Expiry is lazy: each entry records when it was
//! registered and is checked at claim time, with an opportunistic sweep
//! clearing stale entries as events flow through. No timers are armed.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::chat::transport::{ChatId, MessageId, UserId};
use crate::download::MediaFormat;

/// A format choice decoded from a reaction emoji or a reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub format: MediaFormat,
    pub as_document: bool,
}

impl Choice {
    /// Decodes a reaction emoji. Unknown emoji carry no choice.
    pub fn from_reaction(emoji: &str) -> Option<Self> {
        match emoji {
            "👍" => Some(Self { format: MediaFormat::Audio, as_document: false }),
            "❤️" => Some(Self { format: MediaFormat::Video, as_document: false }),
            "📄" => Some(Self { format: MediaFormat::Audio, as_document: true }),
            "📁" => Some(Self { format: MediaFormat::Video, as_document: true }),
            _ => None,
        }
    }

    /// Decodes a reply text quoting the preview, case-insensitive and
    /// trimmed. `1`/`audio`, `2`/`video`, `3`/`videodoc`, `4`/`audiodoc`.
    pub fn from_reply(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "1" | "audio" => Some(Self { format: MediaFormat::Audio, as_document: false }),
            "2" | "video" => Some(Self { format: MediaFormat::Video, as_document: false }),
            "3" | "videodoc" => Some(Self { format: MediaFormat::Video, as_document: true }),
            "4" | "audiodoc" => Some(Self { format: MediaFormat::Audio, as_document: true }),
            _ => None,
        }
    }

    /// Short label for progress texts, e.g. "audio" or "video document".
    pub fn describe(&self) -> String {
        if self.as_document {
            format!("{} document", self.format)
        } else {
            self.format.to_string()
        }
    }
}

/// A preview message awaiting its owner's format choice.
#[derive(Debug, Clone)]
pub struct PendingJob {
    pub chat: ChatId,
    /// Canonical media URL the preview offers.
    pub source_url: String,
    pub title: String,
    /// The originating command message; progress and results quote it.
    pub command_message: MessageId,
    /// Only this identity may claim the preview.
    pub owner: UserId,
}

struct Entry {
    job: PendingJob,
    registered_at: DateTime<Utc>,
}

/// Outcome of a claim attempt against a preview message.
#[derive(Debug)]
pub enum ClaimOutcome {
    /// No pending entry for that message id.
    Unknown,
    /// The entry existed but its window had elapsed; it has been removed.
    Expired,
    /// Someone other than the owner tried; the entry stays pending.
    NotOwner,
    /// First valid claim by the owner; the entry has been removed.
    Granted(PendingJob),
}

/// Registry of previews awaiting a choice.
pub struct InteractionBroker {
    window: Duration,
    pending: Mutex<HashMap<MessageId, Entry>>,
}

impl InteractionBroker {
    /// Broker accepting claims for `window` after registration.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a preview message as awaiting a choice.
    ///
    /// Re-registering the same message id replaces the earlier entry and
    /// restarts its window.
    pub async fn register(&self, preview: MessageId, job: PendingJob) {
        log::debug!("📋 Awaiting choice on preview {} (owner {})", preview, job.owner);
        let mut pending = self.pending.lock().await;
        pending.insert(preview, Entry { job, registered_at: Utc::now() });
    }

    /// Attempts to claim the pending entry for `preview` on behalf of
    /// `claimant`.
    ///
    /// Only the first authorized claim succeeds; the entry is removed with
    /// it, so a second event for the same preview lands on `Unknown`. A
    /// claim by anyone else leaves the entry pending.
    pub async fn claim(&self, preview: &MessageId, claimant: &UserId) -> ClaimOutcome {
        let mut pending = self.pending.lock().await;

        let entry = match pending.get(preview) {
            Some(entry) => entry,
            None => return ClaimOutcome::Unknown,
        };

        if Utc::now().signed_duration_since(entry.registered_at) >= self.window {
            pending.remove(preview);
            log::debug!("📋 Preview {} expired before a choice arrived", preview);
            return ClaimOutcome::Expired;
        }

        if &entry.job.owner != claimant {
            log::debug!("📋 Ignoring claim on preview {} from non-owner {}", preview, claimant);
            return ClaimOutcome::NotOwner;
        }

        match pending.remove(preview) {
            Some(entry) => ClaimOutcome::Granted(entry.job),
            None => ClaimOutcome::Unknown,
        }
    }

    /// Drops every entry whose window has elapsed, returning how many went.
    ///
    /// Called opportunistically as events flow through; entries that never
    /// see another event still expire at claim time.
    pub async fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut pending = self.pending.lock().await;
        let before = pending.len();
        pending.retain(|_, entry| now.signed_duration_since(entry.registered_at) < self.window);
        let removed = before - pending.len();
        if removed > 0 {
            log::debug!("🧹 Swept {} expired preview(s), {} pending", removed, pending.len());
        }
        removed
    }

    /// Number of previews currently awaiting a choice.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}
