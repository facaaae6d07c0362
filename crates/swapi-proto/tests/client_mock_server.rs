//! Drives the real `SwapiClient` against a local axum server serving canned
//! SWAPI responses.
//!
//! Run with: cargo test -p swapi-proto --test client_mock_server

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use swapi_proto::config::ApiConfig;
use swapi_proto::{Entity, EntityKind, SwapiClient, SwapiError};

#[derive(Clone)]
struct MockState {
    addr: SocketAddr,
}

async fn films(State(state): State<MockState>) -> Json<Value> {
    let base = format!("http://{}/api", state.addr);
    Json(json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {
                "title": "A New Hope",
                "episode_id": 4,
                "release_date": "1977-05-25",
                "characters": [format!("{base}/people/1/")],
                "starships": [format!("{base}/starships/10/")],
                "vehicles": [],
                "url": format!("{base}/films/1/")
            },
            {
                "title": "The Empire Strikes Back",
                "episode_id": 5,
                "release_date": "1980-05-17",
                "characters": [format!("{base}/people/1/")],
                "starships": [],
                "vehicles": [format!("{base}/vehicles/14/")],
                "url": format!("{base}/films/2/")
            }
        ]
    }))
}

async fn starships(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let base = format!("http://{}/api", state.addr);
    let term = params.get("search").cloned().unwrap_or_default();
    let results = if "millennium falcon".contains(&term.to_lowercase()) {
        json!([{ "name": "Millennium Falcon", "model": "YT-1300", "url": format!("{base}/starships/10/") }])
    } else {
        json!([])
    };
    Json(json!({ "count": 1, "next": null, "previous": null, "results": results }))
}

/// Two pages of people; the second page is reached through `next`.
async fn people(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let base = format!("http://{}/api", state.addr);
    let page = params.get("page").map(String::as_str).unwrap_or("1");
    let search = params.get("search").cloned().unwrap_or_default();
    if page == "1" {
        Json(json!({
            "count": 2,
            "next": format!("{base}/people/?search={search}&page=2"),
            "previous": null,
            "results": [{ "name": "Luke Skywalker", "url": format!("{base}/people/1/") }]
        }))
    } else {
        Json(json!({
            "count": 2,
            "next": null,
            "previous": format!("{base}/people/?search={search}&page=1"),
            "results": [{ "name": "Luke", "url": format!("{base}/people/99/") }]
        }))
    }
}

/// The term `broken` makes this collection answer 500.
async fn vehicles(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let base = format!("http://{}/api", state.addr);
    let term = params.get("search").cloned().unwrap_or_default();
    if term == "broken" {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let results = if "snowspeeder".contains(&term.to_lowercase()) {
        json!([{ "name": "Snowspeeder", "url": format!("{base}/vehicles/14/") }])
    } else {
        json!([])
    };
    Ok(Json(json!({ "count": 1, "next": null, "previous": null, "results": results })))
}

async fn start_mock_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/films/", get(films))
        .route("/api/starships/", get(starships))
        .route("/api/people/", get(people))
        .route("/api/vehicles/", get(vehicles))
        .with_state(MockState { addr });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn names(entities: &[Entity]) -> Vec<&str> {
    entities.iter().map(|e| e.name.as_str()).collect()
}

fn client_for(addr: SocketAddr, max_pages: usize) -> SwapiClient {
    let config = ApiConfig {
        base_url: format!("http://{}/api", addr),
        timeout_secs: 5,
        max_pages,
        ..ApiConfig::default()
    };
    SwapiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_films() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    let films = client.fetch_films().await.unwrap();
    assert_eq!(films.len(), 2);
    assert_eq!(films[0].title, "A New Hope");
    assert_eq!(films[1].release_year(), Some(1980));
    // Fields missing from the payload default to empty.
    assert!(films[0].planets.is_empty());
}

#[tokio::test]
async fn test_search_sends_term_as_query() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    let hits = client.search(EntityKind::Starship, "Falcon").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Millennium Falcon");
    assert!(hits[0].url.ends_with("/starships/10/"));

    let none = client.search(EntityKind::Starship, "Executor").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_search_first_page_only_by_default() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    let hits = client.search(EntityKind::Person, "Luke").await.unwrap();
    assert_eq!(names(&hits), vec!["Luke Skywalker"]);
}

#[tokio::test]
async fn test_search_follows_next_up_to_max_pages() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 5);

    let hits = client.search(EntityKind::Person, "Luke").await.unwrap();
    assert_eq!(names(&hits), vec!["Luke Skywalker", "Luke"]);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    let err = client.search(EntityKind::Vehicle, "broken").await.unwrap_err();
    match err {
        SwapiError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_all_fails_if_any_collection_fails() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    // people and starships answer, vehicles answers 500
    assert!(client.search_all("broken").await.is_err());
}

#[tokio::test]
async fn test_search_all_returns_people_starships_vehicles() {
    let addr = start_mock_server().await;
    let client = client_for(addr, 1);

    let (people, starships, vehicles) = client.search_all("e").await.unwrap();
    assert_eq!(names(&people), vec!["Luke Skywalker"]);
    assert_eq!(names(&starships), vec!["Millennium Falcon"]);
    assert_eq!(names(&vehicles), vec!["Snowspeeder"]);
    assert!(vehicles[0].url.ends_with("/vehicles/14/"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, 1);
    let err = client.fetch_films().await.unwrap_err();
    assert!(matches!(err, SwapiError::Transport { .. }));
}
