//! Direct-URL resolution.
//!
//! Asks the external provider for a direct media URL for a source and
//! format. Misses are a normal outcome: the resolver retries within its
//! attempt budget and returns `None` when nothing usable came back, it
//! never raises. Callers turn `None` into user-facing feedback.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::core::config;
use crate::download::MediaFormat;

/// Body paths that may carry the media URL, in precedence order.
const URL_FIELDS: &[&[&str]] = &[
    &["data", "audio"],
    &["data", "video"],
    &["audio"],
    &["video"],
    &["url"],
];

/// Maps (source URL, format) to a direct media URL.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolves a direct URL, or `None` when the provider has nothing.
    async fn resolve(&self, source_url: &str, format: MediaFormat) -> Option<Url>;
}

/// Production resolver against the Sky download API.
pub struct SkyResolver {
    client: reqwest::Client,
    base: String,
    key: String,
}

impl SkyResolver {
    /// Resolver configured from the environment (`API_BASE` / `API_KEY`).
    pub fn new() -> anyhow::Result<Self> {
        Self::with_endpoint(config::API_BASE.clone(), config::API_KEY.clone())
    }

    /// Resolver against an explicit endpoint; tests point this at a local
    /// mock server.
    pub fn with_endpoint(base: impl Into<String>, key: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config::resolver::attempt_timeout())
            .build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            key: key.into(),
        })
    }

    async fn attempt(&self, source_url: &str, format: MediaFormat) -> Option<Url> {
        let endpoint = format!("{}/api/download/yt.php", self.base);

        let response = match self
            .client
            .get(&endpoint)
            .query(&[("url", source_url), ("format", format.key())])
            .bearer_auth(&self.key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!("🔗 Provider request failed: {}", e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                log::debug!("🔗 Provider returned error status: {}", e);
                return None;
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::debug!("🔗 Provider body was not JSON: {}", e);
                return None;
            }
        };

        let raw = extract_media_url(&body)?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                log::debug!("🔗 Provider URL unparsable ({}): {}", raw, e);
                None
            }
        }
    }
}

#[async_trait]
impl MediaResolver for SkyResolver {
    async fn resolve(&self, source_url: &str, format: MediaFormat) -> Option<Url> {
        for attempt in 1..=config::resolver::MAX_ATTEMPTS {
            if let Some(url) = self.attempt(source_url, format).await {
                log::info!("🔗 Resolved {} [{}] on attempt {}", source_url, format, attempt);
                return Some(url);
            }
            log::debug!(
                "🔗 Resolve attempt {}/{} came up empty for {} [{}]",
                attempt,
                config::resolver::MAX_ATTEMPTS,
                source_url,
                format
            );
            if attempt < config::resolver::MAX_ATTEMPTS {
                tokio::time::sleep(config::resolver::retry_delay()).await;
            }
        }

        log::warn!(
            "🔗 No usable URL for {} [{}] after {} attempts",
            source_url,
            format,
            config::resolver::MAX_ATTEMPTS
        );
        None
    }
}

/// First URL-bearing field in the body, accepted only with an http scheme.
///
/// Absent, non-string and empty fields fall through to the next candidate;
/// a present non-http value is selected and then rejected, not skipped.
fn extract_media_url(body: &Value) -> Option<&str> {
    URL_FIELDS
        .iter()
        .find_map(|path| {
            let mut node = body;
            for key in *path {
                node = node.get(key)?;
            }
            node.as_str().filter(|raw| !raw.is_empty())
        })
        .filter(|raw| raw.starts_with("http"))
}
