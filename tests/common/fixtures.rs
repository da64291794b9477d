//! Scripted collaborators and byte fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tocadora::download::resolver::MediaResolver;
use tocadora::download::search::{SearchHit, SearchProvider};
use tocadora::download::MediaFormat;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bytes that pass audio validation: an ID3 tag padded past the size floor.
pub fn mp3_fixture_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; 600_000];
    bytes[..3].copy_from_slice(b"ID3");
    bytes
}

/// Bytes that pass video validation: an ftyp box marker in the header.
pub fn mp4_fixture_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; 600_000];
    bytes[4..8].copy_from_slice(b"ftyp");
    bytes
}

/// A plausible search hit for `url`.
pub fn search_hit(url: &str, title: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        duration_label: "4:03".to_string(),
        views: 1_234_567,
        author: "Bad Bunny".to_string(),
        thumbnail_url: Some("https://img.example/thumb.jpg".to_string()),
    }
}

/// Mock media host serving `bytes` at `/media`, with the URL to fetch it.
pub async fn media_host(bytes: Vec<u8>) -> (MockServer, Url) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(&server)
        .await;
    let url = Url::parse(&format!("{}/media", server.uri())).unwrap();
    (server, url)
}

/// Search provider returning a fixed hit list, counting calls.
pub struct ScriptedSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    calls: AtomicU64,
}

impl ScriptedSearch {
    pub fn returning(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            calls: AtomicU64::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    /// Provider whose backend is down; every call errors.
    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(&self, _query: &str) -> anyhow::Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("search backend down");
        }
        Ok(self.hits.clone())
    }
}

/// Resolver returning a fixed URL for every request, counting calls.
pub struct ScriptedResolver {
    url: Option<Url>,
    calls: AtomicU64,
}

impl ScriptedResolver {
    pub fn returning(url: Url) -> Self {
        Self {
            url: Some(url),
            calls: AtomicU64::new(0),
        }
    }

    /// Resolver that never finds anything.
    pub fn empty() -> Self {
        Self {
            url: None,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaResolver for ScriptedResolver {
    async fn resolve(&self, _source_url: &str, _format: MediaFormat) -> Option<Url> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url.clone()
    }
}
