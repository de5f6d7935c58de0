//! HTTP transport and end-to-end resolution against a local mock server

use favi::cache::{cache_key, FileStore, IconStore};
use favi::config::Config;
use favi::fetch::{validate, HttpFetcher, IconFetcher, ProviderFailure};
use favi::{FaviconResolver, IconSource};
use mockito::Server;
use std::time::Duration;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn fetcher(max_icon_bytes: usize) -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5), max_icon_bytes, "favi-tests")
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_returns_image_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/favicon.png")
        .match_header("user-agent", "favi-tests")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(PNG_BYTES)
        .create_async()
        .await;

    let response = fetcher(1024)
        .fetch(&format!("{}/favicon.png", server.url()))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("image/png"));
    assert_eq!(response.body, PNG_BYTES);

    let payload = validate(response, 1024).unwrap();
    assert!(payload.to_data_uri().starts_with("data:image/png;base64,"));
}

#[tokio::test(flavor = "multi_thread")]
async fn error_status_is_a_response_not_a_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/favicon.ico")
        .with_status(404)
        .create_async()
        .await;

    let response = fetcher(1024)
        .fetch(&format!("{}/favicon.ico", server.url()))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(validate(response, 1024), Err(ProviderFailure::BadStatus(404)));
}

#[tokio::test(flavor = "multi_thread")]
async fn html_page_fails_validation() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/favicon.ico")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<html>not found</html>")
        .create_async()
        .await;

    let response = fetcher(1024)
        .fetch(&format!("{}/favicon.ico", server.url()))
        .await
        .unwrap();

    assert!(matches!(
        validate(response, 1024),
        Err(ProviderFailure::NotAnImage(Some(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_body_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/favicon.ico")
        .with_status(200)
        .with_header("content-type", "image/x-icon")
        .with_body(vec![0u8; 4096])
        .create_async()
        .await;

    let result = fetcher(1024)
        .fetch(&format!("{}/favicon.ico", server.url()))
        .await;

    assert_eq!(result, Err(ProviderFailure::TooLarge { limit: 1024 }));
}

#[tokio::test(flavor = "multi_thread")]
async fn resolver_fetches_persists_and_reuses() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/favicon.ico")
        .with_status(200)
        .with_header("content-type", "image/x-icon")
        .with_body(PNG_BYTES)
        .expect(1)
        .create_async()
        .await;

    let temp = TempDir::new().unwrap();
    let icons = temp.path().join("icons");
    let mut config = Config::default();
    config.providers.site_paths = vec!["/favicon.ico".to_string()];
    config.providers.services = Vec::new();

    let page = format!("{}/some/page", server.url());

    let resolver = FaviconResolver::from_config(&config, Some(icons.as_path()), false)
        .await
        .unwrap();
    let first = resolver.resolve_detailed(&page).await;
    assert_eq!(
        first.source,
        IconSource::Provider {
            url: format!("{}/favicon.ico", server.url())
        }
    );
    assert!(first.icon.starts_with("data:image/x-icon;base64,"));
    assert_eq!(first.domain.as_deref(), Some("127.0.0.1"));

    let store = FileStore::new(icons.clone()).await.unwrap();
    let entry = store.get(&cache_key("127.0.0.1")).await.unwrap().unwrap();
    assert_eq!(entry.icon, first.icon);

    // A new process starts with an empty memory tier but the same store
    let restarted = FaviconResolver::from_config(&config, Some(icons.as_path()), false)
        .await
        .unwrap();
    let second = restarted.resolve_detailed(&page).await;
    assert_eq!(second.source, IconSource::Persistent);
    assert_eq!(second.icon, first.icon);

    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn resolver_falls_back_when_site_has_no_icon() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/favicon.ico")
        .with_status(404)
        .create_async()
        .await;

    let mut config = Config::default();
    config.providers.site_paths = vec!["/favicon.ico".to_string()];
    config.providers.services = Vec::new();

    let resolver = FaviconResolver::from_config(&config, None, true).await.unwrap();
    let resolution = resolver
        .resolve_detailed(&format!("{}/", server.url()))
        .await;

    assert!(matches!(resolution.source, IconSource::Fallback(_)));
    assert!(resolution.icon.starts_with("data:image/svg+xml;base64,"));
    assert_eq!(resolver.store().entries().await.unwrap(), Vec::new());
}
