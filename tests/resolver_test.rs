//! Integration tests for the provider resolver against a mock HTTP server.

use serde_json::json;
use tocadora::download::resolver::{MediaResolver, SkyResolver};
use tocadora::download::MediaFormat;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer) -> SkyResolver {
    SkyResolver::with_endpoint(server.uri(), "test-key").unwrap()
}

#[tokio::test]
async fn test_resolves_url_from_nested_audio_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "audio": "https://cdn.example/song.mp3" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Audio)
        .await;

    assert_eq!(resolved.unwrap().as_str(), "https://cdn.example/song.mp3");
}

#[tokio::test]
async fn test_sends_bearer_credential_and_query_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .and(query_param("url", "https://youtu.be/abc123"))
        .and(query_param("format", "video"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://cdn.example/clip.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Video)
        .await;

    assert!(resolved.is_some(), "request with the expected shape never matched");
}

#[tokio::test]
async fn test_retries_transient_failures_then_succeeds() {
    let server = MockServer::start().await;
    // First two attempts hit the expiring failure mock, the third succeeds.
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audio": "https://cdn.example/song.mp3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Audio)
        .await;

    assert!(resolved.is_some(), "third attempt should have succeeded");
}

#[tokio::test]
async fn test_gives_up_after_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Audio)
        .await;

    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_non_http_body_value_is_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "processing"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Audio)
        .await;

    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_non_json_body_is_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/yt.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let resolved = resolver_for(&server)
        .resolve("https://youtu.be/abc123", MediaFormat::Audio)
        .await;

    assert!(resolved.is_none());
}
