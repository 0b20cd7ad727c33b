//! Integration tests for QuarkTV Core

use std::sync::Arc;

use quarktv_core::{
    ClientConfig, EncodingStatus, Error, FixedClock, PlaybackOptions, PlaybackSession,
    PlaybackState, RequestOptions, StreamingClient,
};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-access-key";
const LIBRARY_ID: &str = "12345";

fn client_for(server: &MockServer) -> StreamingClient {
    StreamingClient::new(ClientConfig::new(API_KEY, LIBRARY_ID).with_base_url(server.uri()))
}

fn video_json(guid: &str) -> serde_json::Value {
    json!({
        "videoLibraryId": 12345,
        "guid": guid,
        "title": "Launch day",
        "views": 3,
        "isPublic": true,
        "length": 120,
        "status": 4,
        "captions": [{"srclang": "en", "label": "English", "url": "https://cdn.example/en.vtt"}]
    })
}

fn play_json(guid: &str, playlist: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "video": {
            "videoLibraryId": 12345,
            "guid": guid,
            "title": "Launch day",
            "framerate": 30.0,
            "length": 120,
            "height": 720,
            "width": 1280
        },
        "thumbnailUrl": "https://cdn.example/thumbnail.jpg",
        "previewUrl": "https://cdn.example/preview.webp",
        "fallbackUrl": "https://cdn.example/play_720p.mp4",
        "captionsPath": "/captions/",
        "seekPath": "/seek/"
    });
    if let Some(url) = playlist {
        body["videoPlaylistUrl"] = json!(url);
    }
    body
}

// =============================================================================
// Authenticated Requests
// =============================================================================

#[tokio::test]
async fn test_get_video_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .and(header("AccessKey", API_KEY))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_json("abc")))
        .expect(1)
        .mount(&server)
        .await;

    let video = client_for(&server).get_video("abc").await.unwrap();
    assert_eq!(video.guid, "abc");
    assert_eq!(video.video_library_id, "12345");
    assert_eq!(video.title.as_deref(), Some("Launch day"));
    assert_eq!(video.encoding_status(), Some(EncodingStatus::Finished));
    assert_eq!(video.caption_tracks()[0].srclang.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_get_video_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_json("abc")))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_ok!(client.get_video("abc").await);
    assert_ok!(client.get_video("abc").await);
}

#[tokio::test]
async fn test_not_found_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_video("missing").await.unwrap_err();
    match &err {
        Error::Request { status, body } => {
            assert_eq!(*status, 404);
            assert_eq!(body, "not found");
        }
        other => panic!("expected request error, got {other:?}"),
    }
    assert!(err.to_string().contains("not found"));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_server_error_is_recoverable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_video_statistics("abc").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_video("abc").await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = StreamingClient::new(
        ClientConfig::new(API_KEY, LIBRARY_ID).with_base_url("http://127.0.0.1:1"),
    );
    let err = client.get_video("abc").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_heatmap_and_statistics_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/heatmap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"heatmap": {"0": 12}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"viewsChart": {}, "watchTime": 40})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let heatmap = client.get_video_heatmap("abc").await.unwrap();
    assert_eq!(heatmap["heatmap"]["0"], 12);

    let stats = client.get_video_statistics("abc").await.unwrap();
    assert_eq!(stats["watchTime"], 40);
}

#[tokio::test]
async fn test_request_overrides_headers_and_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/library/12345/videos/abc"))
        .and(header("Accept", "text/plain"))
        .and(header("AccessKey", API_KEY))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({"title": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .with_method(Method::POST)
        .with_header(reqwest::header::ACCEPT, HeaderValue::from_static("text/plain"))
        .with_header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("42"))
        .with_json_body(&json!({"title": "Renamed"}))
        .unwrap();

    let response: serde_json::Value = client_for(&server)
        .request("/library/12345/videos/abc", options)
        .await
        .unwrap();
    assert_eq!(response["success"], true);
}

// =============================================================================
// Play Data
// =============================================================================

#[tokio::test]
async fn test_hls_stream_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .and(header("AccessKey", API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(play_json("abc", Some("https://cdn.example/x.m3u8"))),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.get_hls_stream_url("abc").await.unwrap(),
        "https://cdn.example/x.m3u8"
    );

    let play = client.get_play_url("abc").await.unwrap();
    let video = play.video.unwrap();
    assert_eq!(video.width, Some(1280));
    assert_eq!(video.quality_name(), Some("720p"));
    assert_eq!(play.seek_path.as_deref(), Some("/seek/"));
}

#[tokio::test]
async fn test_hls_stream_url_missing_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(play_json("abc", None)))
        .mount(&server)
        .await;

    let url = client_for(&server).get_hls_stream_url("abc").await.unwrap();
    assert!(url.is_empty());
}

#[tokio::test]
async fn test_hls_stream_url_propagates_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_hls_stream_url("abc").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_video_and_play() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(video_json("abc"))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(play_json("abc", Some("https://cdn.example/abc.m3u8"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (video, play) = tokio::try_join!(client.get_video("abc"), client.get_play_url("abc")).unwrap();

    assert_eq!(video.title.as_deref(), Some("Launch day"));
    assert_eq!(play.hls_url(), "https://cdn.example/abc.m3u8");
}

#[tokio::test]
async fn test_concurrent_across_tasks() {
    let server = MockServer::start().await;
    for guid in ["one", "two", "three"] {
        Mock::given(method("GET"))
            .and(path(format!("/library/12345/videos/{guid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json(guid)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let handles: Vec<_> = ["one", "two", "three"]
        .into_iter()
        .map(|guid| {
            let client = client.clone();
            tokio::spawn(async move { client.get_video(guid).await })
        })
        .collect();

    for (handle, guid) in handles.into_iter().zip(["one", "two", "three"]) {
        let video = handle.await.unwrap().unwrap();
        assert_eq!(video.guid, guid);
    }
}

// =============================================================================
// Playback Session
// =============================================================================

#[tokio::test]
async fn test_playback_session_against_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_json("abc")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(play_json("abc", Some("https://cdn.example/abc.m3u8"))),
        )
        .mount(&server)
        .await;

    let session = PlaybackSession::new(Arc::new(client_for(&server)), PlaybackOptions::default());
    let source = session.load("abc").await.unwrap();

    assert!(source.is_playable());
    assert!(!source.autoplay);
    assert_eq!(source.metadata.guid, "abc");
    assert_eq!(session.state(), PlaybackState::Ready);
}

#[tokio::test]
async fn test_playback_session_fails_on_metadata_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/12345/videos/abc/play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(play_json("abc", Some("https://cdn.example/abc.m3u8"))))
        .mount(&server)
        .await;

    let session = PlaybackSession::new(Arc::new(client_for(&server)), PlaybackOptions::default());
    assert_err!(session.load("abc").await);
    assert_eq!(session.state(), PlaybackState::Failed);
}

// =============================================================================
// Signed URLs
// =============================================================================

#[test]
fn test_thumbnail_url_at_fixed_clock() {
    let client = StreamingClient::new(ClientConfig::new(API_KEY, LIBRARY_ID).with_token_auth_key("k"))
        .with_clock(FixedClock(1_700_000_000));

    assert_eq!(
        client.get_thumbnail_url("abc123", Some(10.0)),
        "https://vz-12345.b-cdn.net/abc123/thumbnail.jpg?token=5076ab731700003600&time=10"
    );
    assert_eq!(
        client.get_thumbnail_url("abc123", None),
        "https://vz-12345.b-cdn.net/abc123/thumbnail.jpg?token=5076ab731700003600"
    );
}

#[test]
fn test_thumbnail_url_custom_cdn() {
    let client = StreamingClient::new(
        ClientConfig::new(API_KEY, LIBRARY_ID)
            .with_cdn_hostname("media.example.com")
            .with_token_auth_key("k"),
    )
    .with_clock(FixedClock(1_700_000_000));

    assert!(client
        .get_thumbnail_url("abc123", None)
        .starts_with("https://media.example.com/abc123/thumbnail.jpg?token="));
}
