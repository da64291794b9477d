use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration for the media fetch pipeline
/// Base URL of the media resolution provider
/// Read from API_BASE environment variable, trailing slashes stripped
/// Default: https://api-sky.ultraplus.click
pub static API_BASE: Lazy<String> = Lazy::new(|| {
    env::var("API_BASE")
        .unwrap_or_else(|_| "https://api-sky.ultraplus.click".to_string())
        .trim_end_matches('/')
        .to_string()
});

/// Bearer credential sent to the media resolution provider
/// Read from API_KEY environment variable
/// Default: Neveloopp (provider's public demo key)
pub static API_KEY: Lazy<String> =
    Lazy::new(|| env::var("API_KEY").unwrap_or_else(|_| "Neveloopp".to_string()));

/// Directory downloads land in
/// Read from DOWNLOAD_DIR environment variable
/// Default: tmp (relative to the working directory, created on demand)
pub static DOWNLOAD_DIR: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "tmp".to_string()));

/// Path of the persisted artifact cache file
/// Read from CACHE_FILE environment variable
/// Default: <DOWNLOAD_DIR>/cache.json
pub static CACHE_FILE: Lazy<String> =
    Lazy::new(|| env::var("CACHE_FILE").unwrap_or_else(|_| format!("{}/cache.json", &*DOWNLOAD_DIR)));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Resolver attempt budget and pacing
pub mod resolver {
    use super::Duration;

    /// Attempts against the provider before giving up
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Timeout per attempt (in seconds)
    pub const ATTEMPT_TIMEOUT_SECS: u64 = 20;

    /// Delay between failed attempts (in milliseconds)
    pub const RETRY_DELAY_MS: u64 = 500;

    /// Per-attempt timeout duration
    pub fn attempt_timeout() -> Duration {
        Duration::from_secs(ATTEMPT_TIMEOUT_SECS)
    }

    /// Inter-attempt delay duration
    pub fn retry_delay() -> Duration {
        Duration::from_millis(RETRY_DELAY_MS)
    }
}

/// Download engine limits
pub mod engine {
    use super::Duration;

    /// Maximum number of concurrent downloads
    pub const MAX_CONCURRENT_DOWNLOADS: usize = 3;

    /// Overall timeout for one download, connect through last byte (in seconds)
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

    /// Redirect hops followed before the transfer is failed
    pub const MAX_REDIRECTS: usize = 5;

    /// Target bitrate for transcoded audio
    pub const AUDIO_BITRATE: &str = "128k";

    /// Overall download timeout duration
    pub fn download_timeout() -> Duration {
        Duration::from_secs(DOWNLOAD_TIMEOUT_SECS)
    }
}

/// Cache retention
pub mod cache {
    /// Entries older than this are purged when the store loads (in days)
    pub const TTL_DAYS: i64 = 7;

    /// TTL in epoch milliseconds, the unit cache timestamps are stored in
    pub fn ttl_millis() -> i64 {
        TTL_DAYS * 24 * 60 * 60 * 1000
    }
}

/// Interaction window for pending previews
pub mod interaction {
    /// Minutes a preview accepts choices before it expires
    pub const PENDING_TTL_MINUTES: i64 = 15;

    /// Window as a chrono duration, comparable against event timestamps
    pub fn pending_window() -> chrono::Duration {
        chrono::Duration::minutes(PENDING_TTL_MINUTES)
    }
}

/// Artifact acceptance thresholds
pub mod validation {
    /// Files below this many bytes are rejected outright
    pub const MIN_FILE_BYTES: u64 = 500_000;

    /// Valid files above this many megabytes are refused delivery
    pub const MAX_FILE_MB: u64 = 99;

    /// Delivery size cap in bytes
    pub fn max_file_bytes() -> u64 {
        MAX_FILE_MB * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_helpers_match_constants() {
        assert_eq!(resolver::attempt_timeout(), Duration::from_secs(20));
        assert_eq!(resolver::retry_delay(), Duration::from_millis(500));
        assert_eq!(engine::download_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_cache_ttl_is_seven_days_of_millis() {
        assert_eq!(cache::ttl_millis(), 7 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_size_cap_is_ninety_nine_mebibytes() {
        assert_eq!(validation::max_file_bytes(), 99 * 1024 * 1024);
    }
}
