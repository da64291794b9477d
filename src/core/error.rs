//! Pipeline error taxonomy.
//!
//! Every failure the pipeline can produce is one of the closed set of
//! variants below, so callers branch on the kind instead of matching
//! message text. [`FetchError::user_message`] maps each kind to the single
//! plain-language line sent to the chat when a job ends in failure.

use thiserror::Error;

/// Errors produced by the media fetch pipeline.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The search provider returned nothing for the query.
    #[error("no search results")]
    NoSearchResult,

    /// The resolution provider exhausted its attempts without a usable URL.
    #[error("no downloadable URL after resolver attempts")]
    ResolveFailed,

    /// Network, timeout or stream failure while moving bytes.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// The file failed its size floor or container signature check.
    #[error("artifact validation failed: {0}")]
    Validation(String),

    /// The file is intact but too large to deliver.
    #[error("file is {actual_mb} MB, limit is {limit_mb} MB")]
    SizeLimit { actual_mb: u64, limit_mb: u64 },

    /// ffmpeg could not produce the target audio encoding.
    #[error("transcode failed: {0}")]
    Transcode(String),

    /// A choice event from someone other than the command issuer.
    #[error("interaction from non-owner")]
    Unauthorized,

    /// A choice event that arrived after the interaction window closed.
    #[error("interaction window expired")]
    Expired,
}

/// Type alias for Result with FetchError
pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    /// Short human-readable line for the one failure message sent to chat.
    ///
    /// Internal detail (provider bodies, ffmpeg stderr, io text) stays in
    /// the logs; the chat only sees the failure category.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSearchResult => "❌ No results found.".to_string(),
            Self::ResolveFailed => {
                "❌ Couldn't get a download link. Try again in a moment.".to_string()
            }
            Self::Transfer(_) => "❌ The download failed due to a network problem.".to_string(),
            Self::Validation(_) => "❌ The file arrived damaged and was discarded.".to_string(),
            Self::SizeLimit { actual_mb, limit_mb } => {
                format!("❌ The file is {actual_mb} MB; the limit is {limit_mb} MB.")
            }
            Self::Transcode(_) => "❌ Audio conversion failed.".to_string(),
            Self::Unauthorized => {
                "❌ Only the person who sent the command can choose.".to_string()
            }
            Self::Expired => "❌ That menu expired. Send the command again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transfer(format!("timed out: {err}"))
        } else {
            Self::Transfer(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::Transfer(format!("file i/o: {err}"))
    }
}
