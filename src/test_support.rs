use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, config::Config, db, models::MovieDetails, store::MovieStore, tmdb::TmdbClient,
};

pub const TEST_TOKEN: &str = "test-token";

pub async fn memory_store() -> MovieStore {
    let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
    MovieStore::new(db)
}

pub fn details(title: &str, year: i32) -> MovieDetails {
    MovieDetails {
        title: title.to_string(),
        year,
        description: format!("About {title}."),
        img_url: "https://image.tmdb.org/t/p/w500/poster.jpg".to_string(),
    }
}

pub async fn test_state() -> Arc<AppState> {
    let tmdb_base_url = fake_tmdb().await;
    let config = Config::from_lookup(|key| match key {
        "TMDB_ACCESS_TOKEN" => Some(TEST_TOKEN.to_string()),
        "TMDB_BASE_URL" => Some(tmdb_base_url.clone()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "TMDB_RPS" => Some("100".to_string()),
        _ => None,
    })
    .unwrap();

    let http = reqwest::Client::builder().timeout(Duration::from_secs(5)).build().unwrap();
    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_base_url.clone(),
        config.tmdb_rps,
    );
    let store = MovieStore::new(db::connect_and_migrate(&config.database_url).await.unwrap());

    Arc::new(AppState { store, tmdb: Arc::new(tmdb) })
}

/// Serves a small slice of the TMDB API on a local port and returns its base URL.
///
/// Search: "Inception" has one hit, "broken" returns invalid JSON, "outage"
/// returns 500, anything else has no hits. Movie ids: 27205 is Inception, 2 has
/// no poster, 3 has no release date, 1 lacks a title, 500 fails, the rest 404.
pub async fn fake_tmdb() -> String {
    let app = Router::new()
        .route("/search/movie", get(fake_search))
        .route("/movie/{id}", get(fake_movie));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TEST_TOKEN}");
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

async fn fake_search(headers: HeaderMap, Query(params): Query<SearchParams>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match params.query.as_str() {
        "Inception" => Json(json!({
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-16",
                "poster_path": "/inception.jpg",
                "overview": "A thief who steals corporate secrets through dreams."
            }]
        }))
        .into_response(),
        "broken" => "{\"results\": [".into_response(),
        "outage" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({ "page": 1, "results": [] })).into_response(),
    }
}

async fn fake_movie(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match id {
        27205 => Json(json!({
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-16",
            "poster_path": "/inception.jpg",
            "overview": "A thief who steals corporate secrets through dreams."
        }))
        .into_response(),
        2 => Json(json!({
            "id": 2,
            "title": "Ariel",
            "release_date": "1988-10-21",
            "poster_path": null,
            "overview": "Taisto Kasurinen is a Finnish coal miner."
        }))
        .into_response(),
        3 => Json(json!({ "id": 3, "title": "Untitled Sequel", "release_date": "" }))
            .into_response(),
        1 => Json(json!({ "id": 1, "release_date": "2001-01-01" })).into_response(),
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
