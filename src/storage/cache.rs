//! Persisted artifact cache
//!
//! Maps a source identifier and format to a previously downloaded, verified
//! artifact path. Backed by a single JSON file rewritten wholesale on every
//! record; loaded once at construction with expired entries and dangling
//! file references pruned on the way in. A missing or corrupt backing file
//! degrades to an empty store, never to an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::config;
use crate::download::MediaFormat;

/// One cached source: creation time plus the artifact per format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Epoch milliseconds of the first record for this source.
    timestamp: i64,
    /// Format-key to artifact path.
    files: HashMap<String, PathBuf>,
}

/// File-backed cache of verified artifacts, keyed by source identifier.
///
/// Owned by the pipeline instance; all access goes through the mutex so
/// concurrent records serialize their rewrites of the backing file.
pub struct ArtifactCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ArtifactCache {
    /// Loads the store from `path`.
    ///
    /// Prunes whole entries older than the TTL and drops individual file
    /// references whose target no longer exists on disk. Never fails: any
    /// read or parse problem starts the store empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        log::info!("🗃️ Artifact cache loaded: {} entries from {}", entries.len(), path.display());
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Returns the recorded artifact path for (source, format), if any.
    pub async fn lookup(&self, source_id: &str, format: MediaFormat) -> Option<PathBuf> {
        let entries = self.entries.lock().await;
        let hit = entries.get(source_id)?.files.get(format.key()).cloned();
        if hit.is_some() {
            log::debug!("🗃️ Cache hit: {} [{}]", source_id, format);
        }
        hit
    }

    /// Records an artifact path for (source, format) and persists the store.
    ///
    /// The entry keeps its original timestamp when a second format is added,
    /// so both formats age out together. Persistence faults are logged and
    /// swallowed; the in-memory record stays usable either way.
    pub async fn record(&self, source_id: &str, format: MediaFormat, artifact: &Path) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(source_id.to_string()).or_insert_with(|| CacheEntry {
            timestamp: chrono::Utc::now().timestamp_millis(),
            files: HashMap::new(),
        });
        entry.files.insert(format.key().to_string(), artifact.to_path_buf());

        if let Err(e) = persist(&self.path, &entries) {
            log::warn!("🗃️ Failed to persist cache to {}: {}", self.path.display(), e);
        }
    }
}

fn read_entries(path: &Path) -> HashMap<String, CacheEntry> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return HashMap::new(),
    };

    let mut parsed: HashMap<String, CacheEntry> = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("🗃️ Cache file {} is corrupt, starting empty: {}", path.display(), e);
            return HashMap::new();
        }
    };

    let now = chrono::Utc::now().timestamp_millis();
    let before = parsed.len();
    parsed.retain(|_, entry| now - entry.timestamp <= config::cache::ttl_millis());
    let expired = before - parsed.len();
    if expired > 0 {
        log::debug!("🗃️ Dropped {} expired cache entries", expired);
    }

    for entry in parsed.values_mut() {
        entry.files.retain(|_, file| file.exists());
    }

    parsed
}

fn persist(path: &Path, entries: &HashMap<String, CacheEntry>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}
