//! Runs the real Trakt and TMDB clients against an in-process stand-in for
//! both upstream APIs.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use cine_tracker::error::AppError;
use cine_tracker::models::{AccessToken, Category, DisplayMovie, PLACEHOLDER_POSTER};
use cine_tracker::services::providers::{
    tmdb::TmdbPosterResolver,
    trakt::{TraktAuth, TraktClient},
    AuthProvider, CatalogProvider, PosterProvider,
};
use cine_tracker::services::ListAggregator;

const CLIENT_ID: &str = "client123";
const TOKEN: &str = "tok-123";
const TMDB_KEY: &str = "tmdb-key";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

fn trakt_headers_ok(headers: &HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    header("authorization") == Some(format!("Bearer {}", TOKEN).as_str())
        && header("trakt-api-key") == Some(CLIENT_ID)
        && header("trakt-api-version") == Some("2")
}

fn wrapped(title: &str, year: i32, tmdb: Option<u64>) -> Value {
    json!({
        "watchers": 3,
        "movie": {
            "title": title,
            "year": year,
            "ids": {"trakt": 100 + year, "slug": title.to_lowercase(), "imdb": null, "tmdb": tmdb}
        }
    })
}

async fn token(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let valid = body["code"] == "good-code"
        && body["client_id"] == CLIENT_ID
        && body["client_secret"] == "secret"
        && body["grant_type"] == "authorization_code"
        && body["redirect_uri"] == "urn:ietf:wg:oauth:2.0:oob";

    if valid {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": TOKEN,
                "token_type": "bearer",
                "expires_in": 7_776_000,
                "refresh_token": "refresh",
                "scope": "public"
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_grant" })),
        )
    }
}

async fn settings(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !trakt_headers_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "user": {"username": "Sean", "ids": {"slug": "sean"}},
            "account": {"timezone": "Europe/Madrid"}
        })),
    )
}

async fn trending(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !trakt_headers_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let items: Vec<Value> = (1..=15)
        .map(|i| wrapped(&format!("Trend{}", i), 2000 + i, Some(i as u64)))
        .collect();
    (StatusCode::OK, Json(Value::Array(items)))
}

async fn watched(Path(user): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !trakt_headers_ok(&headers) || user != "sean" {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!([
            wrapped("Dune", 2021, Some(438631)),
            wrapped("Heat", 1995, Some(949)),
            wrapped("Broken", 1999, Some(13)),
            wrapped("Odd", 1998, Some(14)),
            wrapped("Nameless", 1990, None),
        ])),
    )
}

async fn watchlist() -> Json<Value> {
    Json(json!([]))
}

async fn boxoffice() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn images(
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if params.get("api_key").map(String::as_str) != Some(TMDB_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7})));
    }
    match id {
        438631 => (
            StatusCode::OK,
            Json(json!({"id": id, "backdrops": [{"file_path": "/abc.jpg", "width": 1920}]})),
        ),
        949 => (StatusCode::OK, Json(json!({"id": id, "backdrops": []}))),
        13 => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        14 => (StatusCode::OK, Json(json!({"id": id, "unexpected": true}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "id": id,
                "backdrops": [{"width": 10}, {"file_path": format!("/{}.jpg", id)}]
            })),
        ),
    }
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/users/settings", get(settings))
        .route("/users/:user/watched/movies", get(watched))
        .route("/users/:user/watchlist/movies", get(watchlist))
        .route("/movies/trending", get(trending))
        .route("/movies/boxoffice", get(boxoffice))
        .route("/3/movie/:id/images", get(images));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn auth(base: &str) -> TraktAuth {
    TraktAuth::new(
        reqwest::Client::new(),
        base.to_string(),
        CLIENT_ID.to_string(),
        "secret".to_string(),
        "urn:ietf:wg:oauth:2.0:oob".to_string(),
    )
    .unwrap()
}

fn resolver(base: &str, api_key: Option<&str>) -> TmdbPosterResolver {
    TmdbPosterResolver::new(
        reqwest::Client::new(),
        api_key.map(str::to_string),
        format!("{}/3", base),
        IMAGE_BASE.to_string(),
    )
}

fn aggregator(base: &str) -> ListAggregator {
    let catalog = TraktClient::new(reqwest::Client::new(), base.to_string(), CLIENT_ID.to_string());
    ListAggregator::new(Arc::new(catalog), Arc::new(resolver(base, Some(TMDB_KEY))))
}

#[tokio::test]
async fn test_exchange_code_success() {
    let base = spawn_upstream().await;
    let token = auth(&base).exchange_code("good-code").await.unwrap();
    assert_eq!(token.as_str(), TOKEN);
}

#[tokio::test]
async fn test_exchange_code_rejected() {
    let base = spawn_upstream().await;
    let result = auth(&base).exchange_code("stale-code").await;

    match result {
        Err(AppError::TokenExchange(message)) => assert!(message.contains("401")),
        other => panic!("expected TokenExchange, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_profile() {
    let base = spawn_upstream().await;
    let client = TraktClient::new(reqwest::Client::new(), base, CLIENT_ID.to_string());

    let profile = client.fetch_profile(&AccessToken::new(TOKEN)).await.unwrap();
    assert_eq!(profile.username, "Sean");
    assert_eq!(profile.user_id, "sean");
}

#[tokio::test]
async fn test_fetch_profile_bad_token() {
    let base = spawn_upstream().await;
    let client = TraktClient::new(reqwest::Client::new(), base, CLIENT_ID.to_string());

    let result = client.fetch_profile(&AccessToken::new("revoked")).await;
    assert!(matches!(result, Err(AppError::ProfileFetch(_))));
}

#[tokio::test]
async fn test_fetch_list_failure() {
    let base = spawn_upstream().await;
    let client = TraktClient::new(reqwest::Client::new(), base, CLIENT_ID.to_string());

    let result = client
        .fetch_list(Category::Cinema, &AccessToken::new(TOKEN), None)
        .await;
    assert!(matches!(result, Err(AppError::CatalogFetch(_))));
}

#[tokio::test]
async fn test_fetch_related_rejects_seed_outside_endpoint() {
    let base = spawn_upstream().await;
    let client = TraktClient::new(reqwest::Client::new(), base, CLIENT_ID.to_string());

    let result = client
        .fetch_list(
            Category::Related,
            &AccessToken::new(TOKEN),
            Some("../../recommendations/movies?x=".to_string()),
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_resolve_outcomes() {
    let base = spawn_upstream().await;
    let posters = resolver(&base, Some(TMDB_KEY));

    assert_eq!(
        posters.resolve(438631).await.unwrap(),
        vec![format!("{}/abc.jpg", IMAGE_BASE)]
    );
    assert!(posters.resolve(949).await.unwrap().is_empty());
    assert_eq!(
        posters.resolve(7).await.unwrap(),
        vec![format!("{}/7.jpg", IMAGE_BASE)]
    );
    assert!(matches!(posters.resolve(13).await, Err(AppError::ImageFetch(_))));
    assert!(matches!(posters.resolve(14).await, Err(AppError::ImageFetch(_))));
}

#[tokio::test]
async fn test_resolve_with_wrong_key() {
    let base = spawn_upstream().await;
    let result = resolver(&base, Some("wrong")).resolve(438631).await;
    assert!(matches!(result, Err(AppError::ImageFetch(_))));
}

#[tokio::test]
async fn test_watched_list_end_to_end() {
    let base = spawn_upstream().await;
    let movies = aggregator(&base)
        .build_display_list(Category::Watched, &AccessToken::new(TOKEN))
        .await
        .unwrap();

    let expected = |title: &str, year: i32, poster: &str| DisplayMovie {
        title: title.to_string(),
        year: Some(year),
        poster_url: poster.to_string(),
    };

    assert_eq!(
        movies,
        vec![
            expected("Dune", 2021, "https://image.tmdb.org/t/p/w500/abc.jpg"),
            expected("Heat", 1995, PLACEHOLDER_POSTER),
            expected("Broken", 1999, PLACEHOLDER_POSTER),
            expected("Odd", 1998, PLACEHOLDER_POSTER),
            expected("Nameless", 1990, PLACEHOLDER_POSTER),
        ]
    );
}

#[tokio::test]
async fn test_trending_end_to_end_is_truncated() {
    let base = spawn_upstream().await;
    let movies = aggregator(&base)
        .build_display_list(Category::Trending, &AccessToken::new(TOKEN))
        .await
        .unwrap();

    assert_eq!(movies.len(), 10);
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    let expected: Vec<String> = (1..=10).map(|i| format!("Trend{}", i)).collect();
    assert_eq!(titles, expected);
    assert_eq!(movies[9].poster_url, format!("{}/10.jpg", IMAGE_BASE));
}

#[tokio::test]
async fn test_empty_watchlist_end_to_end() {
    let base = spawn_upstream().await;
    let movies = aggregator(&base)
        .build_display_list(Category::Watchlist, &AccessToken::new(TOKEN))
        .await
        .unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_missing_tmdb_key_still_builds_list() {
    let base = spawn_upstream().await;
    let catalog = TraktClient::new(reqwest::Client::new(), base.clone(), CLIENT_ID.to_string());
    let aggregator = ListAggregator::new(Arc::new(catalog), Arc::new(resolver(&base, None)));

    let movies = aggregator
        .build_display_list(Category::Trending, &AccessToken::new(TOKEN))
        .await
        .unwrap();

    assert_eq!(movies.len(), 10);
    assert!(movies.iter().all(|m| m.poster_url == PLACEHOLDER_POSTER));
}
