use std::sync::Arc;
use std::time::Duration;

use vod_catalog::errors::SourceError;
use vod_catalog::models::{SourceKind, DIRECT_ENTRY_ID};
use vod_catalog::sources::SourceProber;
use vod_catalog::utils::http_client::{HttpFetcher, StandardHttpClient};
use wiremock::matchers::{method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYLIST: &str = "#EXTM3U\n\
#EXTINF:-1 tvg-logo=\"http://img.test/one.png\" group-title=\"Films\",First Film\n\
http://media.test/one.mp4\n\
#EXTINF:-1,Second Film\n\
relative/two.mp4\n";

fn client(max_body_bytes: usize) -> Arc<dyn HttpFetcher> {
    Arc::new(
        StandardHttpClient::new("vod-catalog-test", Duration::from_secs(2), max_body_bytes)
            .unwrap(),
    )
}

fn prober(probe_timeout: Duration, cache_bust: bool) -> SourceProber {
    SourceProber::new(client(1024 * 1024), probe_timeout, cache_bust)
}

#[tokio::test]
async fn test_playlist_is_classified_and_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vod/list.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PLAYLIST, "audio/x-mpegurl"))
        .mount(&server)
        .await;

    let url = format!("{}/vod/list.m3u", server.uri());
    let classification = prober(Duration::from_secs(2), true).classify(&url).await;

    assert_eq!(classification.kind, SourceKind::Playlist);
    assert!(classification.diagnostic.is_none());
    assert_eq!(classification.entries.len(), 2);
    assert_eq!(classification.entries[0].id, "vod-1");
    assert_eq!(classification.entries[0].title, "First Film");
    assert_eq!(classification.entries[0].logo.as_deref(), Some("http://img.test/one.png"));
    assert_eq!(classification.entries[0].group.as_deref(), Some("Films"));
    assert_eq!(
        classification.entries[1].url,
        format!("{}/vod/relative/two.mp4", server.uri())
    );
}

#[tokio::test]
async fn test_playlist_wins_over_video_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PLAYLIST, "video/mp4"))
        .mount(&server)
        .await;

    let url = format!("{}/movie.mp4", server.uri());
    let classification = prober(Duration::from_secs(2), false).classify(&url).await;

    assert_eq!(classification.kind, SourceKind::Playlist);
    assert_eq!(classification.entries.len(), 2);
}

#[tokio::test]
async fn test_missing_playlist_with_video_head_is_direct_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/movie.mp4"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "video/mp4"))
        .mount(&server)
        .await;

    let url = format!("{}/movie.mp4", server.uri());
    let classification = prober(Duration::from_secs(2), true).classify(&url).await;

    assert_eq!(classification.kind, SourceKind::DirectMedia);
    assert_eq!(classification.entries.len(), 1);
    assert_eq!(classification.entries[0].id, DIRECT_ENTRY_ID);
    assert_eq!(classification.entries[0].title, "Direct Video");
    assert_eq!(classification.entries[0].url, url);
}

#[tokio::test]
async fn test_large_video_body_is_not_downloaded_by_playlist_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4096], "video/mp4"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/big.mp4"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "video/mp4"))
        .mount(&server)
        .await;

    let prober = SourceProber::new(client(256), Duration::from_secs(2), false);
    let url = format!("{}/big.mp4", server.uri());

    let playlist_attempt = prober.fetch_playlist(&url, Duration::from_secs(2)).await;
    assert!(matches!(playlist_attempt, Err(SourceError::BodyTooLarge { limit: 256, .. })));

    let classification = prober.classify(&url).await;
    assert_eq!(classification.kind, SourceKind::DirectMedia);
}

#[tokio::test]
async fn test_html_page_is_unclassified_with_both_reasons() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body>hello</body></html>", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    let url = format!("{}/index.html", server.uri());
    let prober = prober(Duration::from_secs(2), true);

    let classification = prober.classify(&url).await;
    assert_eq!(classification.kind, SourceKind::Unclassified);
    assert!(classification.entries.is_empty());
    let diagnostic = classification.diagnostic.unwrap();
    assert!(diagnostic.contains("playlist probe: no playable entries found"));
    assert!(diagnostic.contains("unsupported content type 'text/html'"));

    match prober.try_classify(&url).await {
        Err(SourceError::Unclassifiable { playlist, direct, .. }) => {
            assert!(matches!(*playlist, SourceError::EmptyParse { .. }));
            assert!(matches!(*direct, SourceError::UnsupportedContentType { .. }));
        }
        other => panic!("expected Unclassifiable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_source_times_out_as_unclassified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.m3u"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PLAYLIST)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow.m3u"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let url = format!("{}/slow.m3u", server.uri());
    let classification = prober(Duration::from_millis(200), false).classify(&url).await;

    assert_eq!(classification.kind, SourceKind::Unclassified);
    assert!(classification.diagnostic.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_cache_buster_is_optional() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list.m3u"))
        .and(query_param_is_missing("t"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAYLIST))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/list.m3u", server.uri());
    let entries = prober(Duration::from_secs(2), false)
        .fetch_playlist(&url, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_cache_buster_is_appended_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAYLIST))
        .mount(&server)
        .await;

    let url = format!("{}/list.m3u?token=abc", server.uri());
    prober(Duration::from_secs(2), true)
        .fetch_playlist(&url, Duration::from_secs(2))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(query[0], ("token".to_string(), "abc".to_string()));
    assert_eq!(query[1].0, "t");
    assert!(query[1].1.parse::<i64>().is_ok());
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    // Nothing listens on the discard port
    let url = "http://127.0.0.1:9/list.m3u";
    let result = prober(Duration::from_secs(2), false)
        .fetch_playlist(url, Duration::from_secs(2))
        .await;

    assert!(matches!(result, Err(SourceError::Transport { .. })));
}
