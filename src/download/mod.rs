//! Download management: resolution, transfer, transcode, deduplication

pub mod engine;
pub mod jobs;
pub mod resolver;
pub mod search;
pub mod transcode;

// Re-exports for convenience
pub use engine::DownloadEngine;
pub use jobs::JobRegistry;
pub use resolver::{MediaResolver, SkyResolver};
pub use search::{SearchHit, SearchProvider};

use std::fmt;

/// Requested output kind for a fetch.
///
/// Doubles as the format-key shared by the cache, the job registry and the
/// resolution provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Audio,
    Video,
}

impl MediaFormat {
    /// Wire and cache key for this format.
    pub fn key(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Extension of the finished artifact container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    /// Mime type declared when handing the artifact to a transport.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Audio => "audio/mpeg",
            Self::Video => "video/mp4",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Removes a file if present; failures are logged, never raised.
///
/// Partial and scratch files are best-effort cleanup, a failed unlink
/// must not mask the error that led to it.
pub async fn remove_quietly(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("🧹 Could not remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key_extension_mime_agree() {
        assert_eq!(MediaFormat::Audio.key(), "audio");
        assert_eq!(MediaFormat::Audio.extension(), "mp3");
        assert_eq!(MediaFormat::Audio.mime(), "audio/mpeg");
        assert_eq!(MediaFormat::Video.key(), "video");
        assert_eq!(MediaFormat::Video.extension(), "mp4");
        assert_eq!(MediaFormat::Video.mime(), "video/mp4");
    }

    #[test]
    fn test_format_displays_as_key() {
        assert_eq!(MediaFormat::Audio.to_string(), "audio");
        assert_eq!(MediaFormat::Video.to_string(), "video");
    }
}
