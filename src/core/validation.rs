//! Artifact and filename validation
//!
//! Acceptance checks for downloaded media:
//! - Minimum size floor (rejects provider error pages and truncated bodies)
//! - Container signature check per requested format (MP3 tag/frame sync, MP4 ftyp box)
//! - Delivery size cap
//! - Filename sanitization for transport-facing names
//!
//! Delivery re-runs the full set before sending; downloads that fail here
//! are deleted by the engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::core::config;
use crate::core::error::{FetchError, FetchResult};
use crate::download::MediaFormat;

/// Bytes inspected for container signatures.
const HEADER_LEN: usize = 16;

/// True when the header opens an MP3 stream: an `ID3` tag or a bare
/// MPEG frame sync (0xFF with the next four sync bits set).
pub fn has_mp3_signature(header: &[u8]) -> bool {
    if header.len() >= 3 && &header[..3] == b"ID3" {
        return true;
    }
    header.len() >= 2 && header[0] == 0xFF && header[1] & 0xF0 == 0xF0
}

/// True when the header contains the MP4 `ftyp` box marker.
///
/// The marker sits at byte offset 4 in well-formed files, but the check
/// scans the whole header window like the size probe upstream of it.
pub fn has_mp4_signature(header: &[u8]) -> bool {
    header.windows(4).any(|w| w == b"ftyp")
}

/// True when the file on disk opens with an MP3 signature.
///
/// Unreadable files count as "no"; callers use this as a cheap sniff, not
/// as validation.
pub fn file_has_mp3_signature(path: &Path) -> bool {
    read_header(path).map(|h| has_mp3_signature(&h)).unwrap_or(false)
}

/// Validates a downloaded file against the floor and signature rules.
///
/// # Arguments
/// * `path` - Candidate artifact on disk
/// * `format` - Format the file is supposed to be
///
/// # Returns
/// * `Ok(())` - File is large enough and carries the right signature
/// * `Err(FetchError::Validation)` - Missing, too small, or wrong container
pub fn validate_artifact(path: &Path, format: MediaFormat) -> FetchResult<()> {
    let meta = std::fs::metadata(path)
        .map_err(|e| FetchError::Validation(format!("missing file {}: {e}", path.display())))?;

    if meta.len() < config::validation::MIN_FILE_BYTES {
        return Err(FetchError::Validation(format!(
            "file is {} bytes, below the {} byte floor",
            meta.len(),
            config::validation::MIN_FILE_BYTES
        )));
    }

    let header = read_header(path)?;
    let matches = match format {
        MediaFormat::Audio => has_mp3_signature(&header),
        MediaFormat::Video => has_mp4_signature(&header),
    };
    if !matches {
        return Err(FetchError::Validation(format!(
            "header does not look like {}",
            format.extension()
        )));
    }

    Ok(())
}

/// Refuses files over the delivery size cap.
///
/// # Returns
/// * `Ok(())` - At or under the cap
/// * `Err(FetchError::SizeLimit)` - Over the cap; must not be delivered
pub fn enforce_size_limit(path: &Path) -> FetchResult<()> {
    let size = std::fs::metadata(path)
        .map_err(|e| FetchError::Validation(format!("missing file {}: {e}", path.display())))?
        .len();

    if size > config::validation::max_file_bytes() {
        return Err(FetchError::SizeLimit {
            actual_mb: size.div_ceil(1024 * 1024),
            limit_mb: config::validation::MAX_FILE_MB,
        });
    }

    Ok(())
}

/// Full pre-delivery check: floor, signature and size cap.
///
/// Cached artifacts age on disk, so delivery runs this again even for
/// files the engine validated when it produced them.
pub fn validate_for_delivery(path: &Path, format: MediaFormat) -> FetchResult<()> {
    validate_artifact(path, format)?;
    enforce_size_limit(path)
}

/// Sanitizes a title into a transport-safe filename stem.
///
/// Removes path separators, reserved filesystem characters and control
/// characters; trims surrounding whitespace and dots.
///
/// # Examples
/// ```
/// use tocadora::core::validation::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Song Title"), "Song Title");
/// assert_eq!(sanitize_filename("a/b: c?"), "ab c");
/// assert_eq!(sanitize_filename("***"), "media");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        // Remove filesystem-unsafe characters
        .filter(|c| !['/', '\\', ':', '*', '?', '"', '<', '>', '|'].contains(c))
        // Remove control characters
        .filter(|c| !c.is_control())
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        return "media".to_string();
    }
    trimmed.to_string()
}

fn read_header(path: &Path) -> FetchResult<Vec<u8>> {
    let mut file = File::open(path)
        .map_err(|e| FetchError::Validation(format!("cannot open {}: {e}", path.display())))?;
    let mut buf = [0u8; HEADER_LEN];
    let n = file
        .read(&mut buf)
        .map_err(|e| FetchError::Validation(format!("cannot read {}: {e}", path.display())))?;
    Ok(buf[..n].to_vec())
}
