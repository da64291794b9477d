//! Audio transcoding via ffmpeg
//!
//! Produces the final MP3 for audio fetches. The scratch container from
//! the transfer is transcoded at a fixed bitrate; when it already carries
//! an MP3 signature it is renamed instead, since re-encoding MP3 at a
//! fixed bitrate can only lose quality. The scratch file is gone after
//! either outcome, success or failure.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::core::error::{FetchError, FetchResult};
use crate::core::validation::file_has_mp3_signature;
use crate::download::remove_quietly;

/// Check if ffmpeg is available
pub async fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Transcodes `input` to an MP3 beside it and removes the original.
///
/// # Arguments
/// * `input` - Scratch file from the transfer, any audio container
/// * `bitrate` - Target bitrate, e.g. "128k"
///
/// # Returns
/// Path of the MP3, or `FetchError::Transcode` with the ffmpeg stderr.
pub async fn to_mp3(input: &Path, bitrate: &str) -> FetchResult<PathBuf> {
    let output = input.with_extension("mp3");

    if file_has_mp3_signature(input) {
        log::debug!("🎛️ {} is already MP3, renaming", input.display());
        tokio::fs::rename(input, &output).await?;
        return Ok(output);
    }

    let run = Command::new("ffmpeg")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-acodec")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg(bitrate)
        .arg(&output)
        .output()
        .await;

    let finished = match run {
        Ok(finished) => finished,
        Err(e) => {
            remove_quietly(input).await;
            return Err(FetchError::Transcode(format!("could not run ffmpeg: {e}")));
        }
    };

    if !finished.status.success() {
        let stderr = String::from_utf8_lossy(&finished.stderr).trim().to_string();
        log::error!("🎛️ ffmpeg failed on {}: {}", input.display(), stderr);
        remove_quietly(input).await;
        remove_quietly(&output).await;
        return Err(FetchError::Transcode(stderr));
    }

    remove_quietly(input).await;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mp3_scratch_is_renamed_not_reencoded() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("take.media");
        let mut f = std::fs::File::create(&scratch).unwrap();
        f.write_all(b"ID3\x04\x00").unwrap();
        f.write_all(&[0u8; 1024]).unwrap();
        drop(f);

        let out = to_mp3(&scratch, "128k").await.unwrap();

        assert_eq!(out, dir.path().join("take.mp3"));
        assert!(out.exists());
        assert!(!scratch.exists());
    }

    #[tokio::test]
    async fn test_garbage_scratch_fails_and_is_removed() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("take.media");
        std::fs::write(&scratch, b"definitely not audio").unwrap();

        // Fails whether ffmpeg is installed (bad input) or not (no binary);
        // the scratch file must be gone either way.
        let result = to_mp3(&scratch, "128k").await;

        assert!(matches!(result, Err(FetchError::Transcode(_))));
        assert!(!scratch.exists());
    }
}
