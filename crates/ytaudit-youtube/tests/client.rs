//! Integration tests for `YoutubeClient` using wiremock HTTP mocks.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytaudit_youtube::{YoutubeClient, YoutubeError};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 5, "ytaudit-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn video_json(id: &str, title: &str, views: &str) -> serde_json::Value {
    json!({
        "id": id,
        "snippet": {
            "title": title,
            "description": format!("Description of {id}"),
            "publishedAt": "2024-06-01T12:00:00Z"
        },
        "statistics": {
            "viewCount": views,
            "likeCount": "10",
            "commentCount": "2"
        }
    })
}

fn playlist_item(video_id: &str) -> serde_json::Value {
    json!({ "snippet": { "resourceId": { "videoId": video_id } } })
}

async fn mount_uploads_playlist(server: &MockServer, channel_id: &str, playlist_id: &str) {
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "contentDetails"))
        .and(query_param("id", channel_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "contentDetails": { "relatedPlaylists": { "uploads": playlist_id } }
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolve_channel_id_passes_through_channel_path() {
    // No mocks mounted: a network call would fail the test.
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let id = client
        .resolve_channel_id("https://www.youtube.com/channel/UCabc")
        .await
        .expect("channel path should resolve without a request");
    assert_eq!(id, "UCabc");
}

#[tokio::test]
async fn resolve_channel_id_searches_for_handle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("key", "test-key"))
        .and(query_param("type", "channel"))
        .and(query_param("q", "@creator"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "snippet": { "channelId": "UCfromSearch", "title": "Creator" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .resolve_channel_id("https://www.youtube.com/@creator")
        .await
        .expect("handle should resolve");
    assert_eq!(id, "UCfromSearch");
}

#[tokio::test]
async fn resolve_channel_id_reports_unknown_handle_as_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .resolve_channel_id("https://www.youtube.com/@ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn resolve_channel_id_rejects_unrecognized_url() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let err = client
        .resolve_channel_id("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();
    assert!(matches!(err, YoutubeError::InvalidInput(_)));
    assert!(!err.is_fetch_error());
}

#[tokio::test]
async fn fetch_channel_metadata_returns_parsed_channel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "snippet,statistics"))
        .and(query_param("id", "UC1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "UC1",
                "snippet": {
                    "title": "Tech Channel",
                    "description": "Reviews and more",
                    "country": "US",
                    "publishedAt": "2015-02-03T04:05:06Z"
                },
                "statistics": {
                    "viewCount": "1000000",
                    "subscriberCount": "25000",
                    "hiddenSubscriberCount": false,
                    "videoCount": "321"
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let meta = client
        .fetch_channel_metadata("UC1")
        .await
        .expect("should parse channel");

    assert_eq!(meta.id, "UC1");
    assert_eq!(meta.title, "Tech Channel");
    assert_eq!(meta.country.as_deref(), Some("US"));
    assert_eq!(meta.subscriber_count, Some(25_000));
    assert_eq!(meta.video_count, Some(321));
    assert_eq!(meta.view_count, Some(1_000_000));
    assert!(meta.published_at.is_some());
}

#[tokio::test]
async fn fetch_channel_metadata_missing_items_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "youtube#channelListResponse" })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_channel_metadata("UCnope").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn api_error_surfaces_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The request cannot be completed because you have exceeded your quota." }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_channel_metadata("UC1").await.unwrap_err();

    match &err {
        YoutubeError::Api { status, message } => {
            assert_eq!(*status, 403);
            assert!(message.contains("exceeded your quota"), "message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_channel_metadata("UC1").await.unwrap_err();
    assert!(
        matches!(err, YoutubeError::Deserialize { ref context, .. } if context == "channels"),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_recent_videos_keeps_playlist_order_and_skips_missing() {
    let server = MockServer::start().await;
    mount_uploads_playlist(&server, "UC1", "UU1").await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU1"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [playlist_item("v3"), playlist_item("v2"), playlist_item("v1")]
        })))
        .mount(&server)
        .await;

    // The videos endpoint answers out of order and omits a private video.
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v3,v2,v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                video_json("v1", "Oldest", "100"),
                video_json("v3", "Newest", "300")
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .fetch_recent_videos("UC1", 10)
        .await
        .expect("should fetch videos");

    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v3", "v1"]);
    assert_eq!(videos[0].views, 300);
    assert_eq!(videos[0].likes, 10);
    assert_eq!(videos[0].comments, 2);
    assert_eq!(videos[0].description, "Description of v3");
}

#[tokio::test]
async fn fetch_recent_videos_pages_through_playlist_until_limit() {
    let server = MockServer::start().await;
    mount_uploads_playlist(&server, "UC1", "UU1").await;

    let first_page: Vec<String> = (0..50).map(|i| format!("a{i}")).collect();
    let second_page: Vec<String> = (0..20).map(|i| format!("b{i}")).collect();

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": first_page.iter().map(|id| playlist_item(id)).collect::<Vec<_>>(),
            "nextPageToken": "PAGE2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Only 10 more are needed, but the page returns 20; the extra are dropped.
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("maxResults", "10"))
        .and(query_param("pageToken", "PAGE2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": second_page.iter().map(|id| playlist_item(id)).collect::<Vec<_>>(),
            "nextPageToken": "PAGE3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", first_page.join(",").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": first_page.iter().map(|id| video_json(id, "A", "1")).collect::<Vec<_>>()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let second_ids = second_page[..10].join(",");
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", second_ids.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": second_page[..10].iter().map(|id| video_json(id, "B", "2")).collect::<Vec<_>>()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .fetch_recent_videos("UC1", 60)
        .await
        .expect("should page through uploads");

    assert_eq!(videos.len(), 60);
    assert_eq!(videos[0].id, "a0");
    assert_eq!(videos[49].id, "a49");
    assert_eq!(videos[50].id, "b0");
    assert_eq!(videos[59].id, "b9");
}

#[tokio::test]
async fn fetch_recent_videos_empty_playlist_returns_empty_vec() {
    let server = MockServer::start().await;
    mount_uploads_playlist(&server, "UC1", "UU1").await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client.fetch_recent_videos("UC1", 25).await.unwrap();
    assert!(videos.is_empty());
}

#[tokio::test]
async fn fetch_recent_videos_unknown_channel_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_recent_videos("UCnope", 10).await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn fetch_recent_videos_rejects_out_of_range_limit() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    for limit in [0, 101] {
        let err = client.fetch_recent_videos("UC1", limit).await.unwrap_err();
        assert!(
            matches!(err, YoutubeError::InvalidInput(_)),
            "expected InvalidInput for limit {limit}, got: {err:?}"
        );
    }
}
