use reelgrid_core::{MediaKind, MediaRef};
use reelgrid_metadata::{
    CatalogConfig, DiscoverQuery, DiscoverSource, MetadataError, MetadataSource, TmdbClient,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer, api_key: Option<&str>) -> TmdbClient {
    TmdbClient::new(CatalogConfig {
        api_base: server.uri(),
        api_key: api_key.map(Into::into),
        ..Default::default()
    })
    .unwrap()
}

fn netflix_query(kind: MediaKind, page: u32) -> DiscoverQuery {
    DiscoverQuery {
        kind,
        provider_id: 8,
        region: "US".into(),
        page,
        genre: None,
    }
}

#[tokio::test]
async fn discover_sends_provider_filter_and_stamps_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("with_watch_providers", "8"))
        .and(query_param("watch_region", "US"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("page", "3"))
        .and(query_param("api_key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 3,
            "total_pages": 12,
            "results": [
                { "id": 66732, "name": "Stranger Things" },
                { "id": 71446, "name": "Money Heist" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret")).await;
    let page = client.discover(&netflix_query(MediaKind::Tv, 3)).await.unwrap();

    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 12);
    assert_eq!(page.results.len(), 2);
    assert!(page.results.iter().all(|i| i.kind == MediaKind::Tv));
}

#[tokio::test]
async fn discover_forwards_genre_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_pages": 1,
            "results": [{ "id": 1, "title": "Action Film" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None).await;
    let query = DiscoverQuery {
        genre: Some(28),
        ..netflix_query(MediaKind::Movie, 1)
    };
    let page = client.discover(&query).await.unwrap();
    assert_eq!(page.results[0].title, "Action Film");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, None).await;
    let err = client
        .discover(&netflix_query(MediaKind::Movie, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::Status(503)));

    let err = client
        .details(MediaRef::new(MediaKind::Movie, 42))
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::NotFound));
}

#[tokio::test]
async fn search_keeps_only_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "office"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 2316, "media_type": "tv", "name": "The Office" },
                { "id": 1, "media_type": "person", "name": "Office Person" },
                { "id": 9, "media_type": "movie", "title": "Office Space" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, None).await;
    let results = client.search("office").await.unwrap();
    let keys: Vec<_> = results.iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec![(MediaKind::Tv, 2316), (MediaKind::Movie, 9)]);
}

#[tokio::test]
async fn season_episodes_and_genres() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1396/season/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episodes": [
                { "episode_number": 1, "name": "Seven Thirty-Seven", "runtime": 47, "air_date": "2009-03-08" },
                { "episode_number": 2, "name": "Grilled" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 18, "name": "Drama" }, { "id": 10759, "name": "Action & Adventure" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, None).await;
    let episodes = client.season_episodes(1396, 2).await.unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].runtime_minutes, Some(47));
    assert_eq!(episodes[1].air_date, None);

    let genres = client.genres(MediaKind::Tv).await.unwrap();
    assert_eq!(genres[1].name, "Action & Adventure");
}
