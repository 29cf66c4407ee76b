//! Tests for the catalog client against a mock server.

use cadence_catalog::{CatalogClient, CatalogConfig, CatalogError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn song(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "duration": "200",
        "primaryArtists": "Test Artist",
        "image": [{ "quality": "500x500", "link": format!("https://img/{id}.jpg") }],
        "downloadUrl": [{ "quality": "320kbps", "link": format!("https://cdn/{id}.mp4") }]
    })
}

async fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(CatalogConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let client = CatalogClient::new(CatalogConfig::new("https://example.com/")).unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn test_empty_url_rejected() {
        match CatalogClient::new(CatalogConfig::new("  ")) {
            Err(CatalogError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(matches!(
            CatalogClient::new(CatalogConfig::new("ftp://example.com")),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_default_points_at_public_catalog() {
        let client = CatalogClient::new(CatalogConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://saavn.sumit.co");
    }
}

// =============================================================================
// Search Tests
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_tracks_sends_paging_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search/songs"))
            .and(query_param("query", "tum hi ho"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "total": 42, "start": 20, "results": [song("a", "A"), song("b", "B")] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .await
            .search_tracks("tum hi ho", 1, 20)
            .await
            .unwrap();

        assert_eq!(page.total, 42);
        assert_eq!(page.start, 20);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].duration_secs, Some(200));
    }

    #[tokio::test]
    async fn test_legacy_status_flag_counts_as_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search/artists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "data": { "results": [{ "id": "459320", "name": "Arijit Singh", "image": [] }] }
            })))
            .mount(&server)
            .await;

        let page = client_for(&server)
            .await
            .search_artists("arijit", 0, 20)
            .await
            .unwrap();

        assert_eq!(page.results[0].name, "Arijit Singh");
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "rate limited"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.search_albums("x", 0, 20).await {
            Err(CatalogError::Unsuccessful(msg)) => assert_eq!(msg, "rate limited"),
            other => panic!("Expected Unsuccessful, got {other:?}"),
        }

        // Lenient variant swallows the failure
        assert!(client.search_albums_or_empty("x", 0, 20).await.results.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search/playlists"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        match client_for(&server).await.search_playlists("x", 0, 20).await {
            Err(CatalogError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
    }
}

// =============================================================================
// Detail Endpoint Tests
// =============================================================================

mod details {
    use super::*;

    #[tokio::test]
    async fn test_get_track_takes_first_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/songs/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [song("abc", "Song")]
            })))
            .mount(&server)
            .await;

        let track = client_for(&server).await.get_track("abc").await.unwrap();
        assert_eq!(track.map(|t| t.name), Some("Song".to_string()));
    }

    #[tokio::test]
    async fn test_suggestions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/songs/abc/suggestions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [song("s1", "One"), song("s2", "Two")]
            })))
            .mount(&server)
            .await;

        let tracks = client_for(&server)
            .await
            .get_track_suggestions("abc")
            .await
            .unwrap();
        assert_eq!(tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_artist_tracks_wrapped_and_bare() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/artists/1/songs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "total": 1, "songs": [song("a", "A")] }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/artists/2/songs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [song("b", "B")]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.get_artist_tracks("1").await.unwrap()[0].id, "a");
        assert_eq!(client.get_artist_tracks("2").await.unwrap()[0].id, "b");
    }

    #[tokio::test]
    async fn test_artist_detail_is_raw_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/artists/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "id": "1", "name": "Someone", "followerCount": 12 }
            })))
            .mount(&server)
            .await;

        let artist = client_for(&server).await.get_artist("1").await.unwrap();
        assert_eq!(artist["name"], "Someone");
    }

    #[tokio::test]
    async fn test_playlist_uses_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/playlists"))
            .and(query_param("id", "pl1"))
            .and(query_param("page", "0"))
            .and(query_param("limit", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "pl1",
                    "name": "Top 50",
                    "songCount": "50",
                    "songs": [song("a", "A")]
                }
            })))
            .mount(&server)
            .await;

        let playlist = client_for(&server)
            .await
            .get_playlist("pl1", 0, 30)
            .await
            .unwrap();

        assert_eq!(playlist.song_count, Some(50));
        assert_eq!(playlist.songs.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_yields_empty_results() {
        // Nothing listens on this port once the server is dropped
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        let client = CatalogClient::new(CatalogConfig::new(uri)).unwrap();
        assert!(client.get_track_suggestions_or_empty("x").await.is_empty());
        assert!(client.get_track_or_empty("x").await.is_none());
    }
}
